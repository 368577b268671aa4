//! Pass 2: LLM-assigned sub-scores, deterministically filtered and
//! ranked in Rust (§4.6). The model never decides what to keep — it only
//! scores; `filter::filter` makes the keep/drop/cap decisions.

use std::path::Path;

use clipcheck_adapters::Llm;
use clipcheck_models::{Pass1Analysis, Pass2Analysis, Pass2Segment, SubScores, TwoPassConfig};
use clipcheck_retry::{retry_async, RetryConfig, RetryOutcome};
use serde::Deserialize;

use crate::attempt::{classify_attempt, AttemptError};
use crate::error::{AnalysisResult, AnalysisStageError, SubStage};
use crate::filter;
use crate::prompt::call_llm_for_json;

const PASS2_PROMPT: &str = "Read the attached pass1_analysis. For every segment, assign five \
sub-scores on a 1-10 scale: quote_strength, factual_accuracy, potential_impact, specificity, \
context_appropriateness. Respond with JSON: {\"scores\": [{\"segment_id\": ..., ...}]}. Score \
every segment_id exactly once; do not invent new ones.";

#[derive(Debug, Deserialize)]
struct RawScoreSet {
    scores: Vec<RawScore>,
}

#[derive(Debug, Deserialize)]
struct RawScore {
    segment_id: String,
    quote_strength: f64,
    factual_accuracy: f64,
    potential_impact: f64,
    specificity: f64,
    context_appropriateness: f64,
}

fn build_candidates(pass1: &Pass1Analysis, raw: RawScoreSet) -> Result<Vec<Pass2Segment>, String> {
    let mut candidates = Vec::with_capacity(raw.scores.len());
    for score in raw.scores {
        let base = pass1
            .segments
            .iter()
            .find(|s| s.segment_id == score.segment_id)
            .ok_or_else(|| format!("pass2 scored unknown segment_id {}", score.segment_id))?
            .clone();
        candidates.push(Pass2Segment {
            base,
            scores: SubScores {
                quote_strength: score.quote_strength,
                factual_accuracy: score.factual_accuracy,
                potential_impact: score.potential_impact,
                specificity: score.specificity,
                context_appropriateness: score.context_appropriateness,
            },
        });
    }
    Ok(candidates)
}

/// Runs pass 2: scores every pass-1 segment via the LLM, then applies the
/// deterministic filtering rules locally.
pub async fn run_pass2(
    llm: &dyn Llm,
    pass1_path: &Path,
    pass1: &Pass1Analysis,
    two_pass_config: &TwoPassConfig,
    retry_config: &RetryConfig,
) -> AnalysisResult<Pass2Analysis> {
    let outcome = retry_async(retry_config, classify_attempt, |_attempt| async move {
        let raw: RawScoreSet = call_llm_for_json(llm, PASS2_PROMPT, &[pass1_path]).await?;
        let candidates = build_candidates(pass1, raw).map_err(AttemptError::Invariant)?;
        let filtered = filter::filter(candidates, two_pass_config);
        filtered.validate_subset_of(pass1).map_err(AttemptError::Invariant)?;
        Ok(filtered)
    })
    .await;

    match outcome {
        RetryOutcome::Success(analysis) => Ok(analysis),
        RetryOutcome::Exhausted { error, .. } => {
            Err(AnalysisStageError::new(SubStage::Pass2QualityAssessment, error.to_string()))
        },
    }
}
