//! `StageError{subStage, cause}` for the two-pass controller.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubStage {
    Pass1Analysis,
    Pass2QualityAssessment,
    ScriptGeneration,
    RebuttalVerification,
}

impl SubStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubStage::Pass1Analysis => "pass1_analysis",
            SubStage::Pass2QualityAssessment => "pass2_quality_assessment",
            SubStage::ScriptGeneration => "script_generation",
            SubStage::RebuttalVerification => "rebuttal_verification",
        }
    }
}

impl fmt::Display for SubStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{sub_stage} failed: {cause}")]
pub struct AnalysisStageError {
    pub sub_stage: SubStage,
    pub cause: String,
}

impl AnalysisStageError {
    pub fn new(sub_stage: SubStage, cause: impl Into<String>) -> Self {
        Self { sub_stage, cause: cause.into() }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisStageError>;
