//! Two-Pass Content-Analysis Controller (C6): broad pass-1 extraction,
//! deterministic pass-2 filtering, narrative script generation, and
//! rebuttal (fact-check) verification.

mod attempt;
pub mod controller;
pub mod error;
pub mod filter;
mod pass1;
mod pass2;
mod prompt;
mod script;
mod verify;

pub use controller::{run_filter_script_verify, run_pass1};
pub use error::{AnalysisResult, AnalysisStageError, SubStage};
