//! Shared data models for the clipcheck pipeline.
//!
//! This crate provides serde-serializable types for:
//! - Episode identity
//! - The transcript artifact
//! - Pass-1/pass-2 content-analysis artifacts
//! - Unified/verified script artifacts (section sum type)
//! - Stage records and run reports
//! - Configuration knobs
//! - Session-scoped progress events

pub mod analysis;
pub mod config;
pub mod episode;
pub mod event;
pub mod script;
pub mod stage;
pub mod transcript;

pub use analysis::{EvidenceQuote, Pass1Analysis, Pass1Segment, Pass2Analysis, Pass2Segment, Severity, SubScores};
pub use config::{ConcurrencyConfig, PathsConfig, PipelineConfig, RetryPolicyConfig, TwoPassConfig};
pub use episode::{EpisodeId, EpisodeRef};
pub use event::{ProgressEvent, SessionId};
pub use script::{Section, SectionKind, UnifiedScript, VerifiedScript};
pub use stage::{ArtifactRef, RunReport, StageName, StageRecord, StageState};
pub use transcript::{Transcript, TranscriptSegment};
