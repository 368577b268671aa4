//! Pipeline Orchestrator (C7) and Session Log & Progress Events (C8): runs
//! the seven stages end to end, cache-first, with a bounded worker pool for
//! the TTS and clipping stages and an append-only session log throughout.

mod cancel;
pub mod error;
mod options;
mod orchestrator;
mod pool;
mod progress;
mod stages;

pub use cancel::{CancelSignal, CancelToken};
pub use error::{PipelineError, PipelineResult};
pub use options::RunOptions;
pub use orchestrator::run;
pub use progress::ProgressRecorder;
pub use stages::final_output_name;
