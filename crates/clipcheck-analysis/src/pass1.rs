//! Pass 1: broad candidate-segment extraction from the transcript.

use std::path::Path;

use clipcheck_adapters::Llm;
use clipcheck_models::Pass1Analysis;
use clipcheck_retry::{retry_async, RetryConfig, RetryOutcome};

use crate::attempt::{classify_attempt, AttemptError};
use crate::error::{AnalysisResult, AnalysisStageError, SubStage};
use crate::prompt::call_llm_for_json;

const PASS1_PROMPT: &str = "Read the attached transcript and surface every segment that is a \
candidate for fact-checking or commentary. For each, report segment_id, title, severity, \
harm_category, evidence quotes with timestamps, surrounding context, confidence, duration_seconds, \
context_start and context_end. Respond with JSON matching the pass1_analysis schema.";

/// Runs pass 1 against `transcript_path` (the already-persisted
/// `transcript.json` artifact), regenerating on invariant failure up to
/// `retry_config.max_attempts` (§4.6).
pub async fn run_pass1(
    llm: &dyn Llm,
    transcript_path: &Path,
    retry_config: &RetryConfig,
) -> AnalysisResult<Pass1Analysis> {
    let outcome = retry_async(retry_config, classify_attempt, |_attempt| async move {
        let analysis: Pass1Analysis = call_llm_for_json(llm, PASS1_PROMPT, &[transcript_path]).await?;
        analysis.validate().map_err(AttemptError::Invariant)?;
        Ok(analysis)
    })
    .await;

    match outcome {
        RetryOutcome::Success(analysis) => Ok(analysis),
        RetryOutcome::Exhausted { error, .. } => {
            Err(AnalysisStageError::new(SubStage::Pass1Analysis, error.to_string()))
        },
    }
}
