//! Rebuttal verification: fact-checks narration claims and corrects
//! overstated ones, without touching clip timing or section structure
//! (§4.6 structural-preservation invariant).

use std::path::Path;

use clipcheck_adapters::Llm;
use clipcheck_models::{UnifiedScript, VerifiedScript};
use clipcheck_retry::{retry_async, RetryConfig, RetryOutcome};
use serde::Deserialize;

use crate::attempt::{classify_attempt, AttemptError};
use crate::error::{AnalysisResult, AnalysisStageError, SubStage};
use crate::prompt::call_llm_for_json;

const VERIFY_PROMPT: &str = "Read the attached unified_script and pass2_filtered. Fact-check every \
claim in every pre_clip and post_clip section's script_content against its associated clip's \
evidence quotes in pass2_filtered (match by clip_id/segment_id); fact-check intro and outro \
sections against the evidence as a whole. Respond with JSON: \
{\"corrections\": [{\"section_id\": ..., \"script_content\": ...}]}, one entry per section that \
needs a wording change; omit sections that are already accurate. Do not reference clip timing or \
section ordering.";

#[derive(Debug, Deserialize)]
struct CorrectionSet {
    corrections: Vec<Correction>,
}

#[derive(Debug, Deserialize)]
struct Correction {
    section_id: String,
    script_content: String,
}

fn apply_corrections(unified: &UnifiedScript, corrections: CorrectionSet) -> Result<VerifiedScript, String> {
    let mut sections = unified.sections.clone();
    for correction in corrections.corrections {
        let target = sections
            .iter_mut()
            .find(|s| s.section_id() == correction.section_id)
            .ok_or_else(|| format!("correction references unknown section_id {}", correction.section_id))?;
        *target = target.with_script_content(correction.script_content);
    }
    Ok(VerifiedScript { sections })
}

/// Runs rebuttal verification, regenerating on structural-preservation
/// failure (e.g. the model hallucinates a timing or ordering change).
/// `pass2_path` carries the evidence quotes each narration claim is
/// fact-checked against (§4.6) — the unified script alone has no evidence.
pub async fn run_rebuttal_verification(
    llm: &dyn Llm,
    unified_path: &Path,
    pass2_path: &Path,
    unified: &UnifiedScript,
    retry_config: &RetryConfig,
) -> AnalysisResult<VerifiedScript> {
    let outcome = retry_async(retry_config, classify_attempt, |_attempt| async move {
        let corrections: CorrectionSet =
            call_llm_for_json(llm, VERIFY_PROMPT, &[unified_path, pass2_path]).await?;
        let verified = apply_corrections(unified, corrections).map_err(AttemptError::Invariant)?;
        verified.validate().map_err(AttemptError::Invariant)?;
        verified.validate_preserves_structure_of(unified).map_err(AttemptError::Invariant)?;
        Ok(verified)
    })
    .await;

    match outcome {
        RetryOutcome::Success(verified) => Ok(verified),
        RetryOutcome::Exhausted { error, .. } => {
            Err(AnalysisStageError::new(SubStage::RebuttalVerification, error.to_string()))
        },
    }
}
