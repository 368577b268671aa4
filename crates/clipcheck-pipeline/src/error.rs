//! `StageError{stage, subStage?, cause}` (§7), the uniform error the
//! orchestrator raises out of `run`.

use clipcheck_adapters::AdapterError;
use clipcheck_analysis::{AnalysisStageError, SubStage};
use clipcheck_cache::CacheError;
use clipcheck_models::StageName;
use clipcheck_workspace::WorkspaceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// Carries `WorkspaceError::Busy` through distinctly so the CLI can map
    /// it to exit code 3 (§6) without string-matching.
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("stage {stage:?} failed: {cause}")]
    Stage { stage: StageName, cause: String },

    #[error("run cancelled during stage {stage:?}")]
    Cancelled { stage: StageName },
}

impl PipelineError {
    pub fn stage(stage: StageName, cause: impl Into<String>) -> Self {
        Self::Stage { stage, cause: cause.into() }
    }

    pub fn from_adapter(stage: StageName, error: AdapterError) -> Self {
        Self::stage(stage, error.to_string())
    }

    pub fn from_cache(stage: StageName, error: CacheError) -> Self {
        Self::stage(stage, error.to_string())
    }

    /// `sub_stage` tells us which pipeline stage actually failed: pass 1
    /// maps to stage 3, the other three sub-stages all belong to stage 4's
    /// filter/script/verify sequence.
    pub fn from_analysis(error: AnalysisStageError) -> Self {
        let stage = match error.sub_stage {
            SubStage::Pass1Analysis => StageName::ContentAnalysisPass1,
            SubStage::Pass2QualityAssessment | SubStage::ScriptGeneration | SubStage::RebuttalVerification => {
                StageName::NarrativeGeneration
            },
        };
        Self::stage(stage, error.to_string())
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
