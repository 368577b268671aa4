//! Narrative generation: turns the pass-2 filtered segments into a full
//! intro/pre-clip/video-clip/post-clip/outro script.

use std::path::Path;

use clipcheck_adapters::Llm;
use clipcheck_models::{Pass2Analysis, UnifiedScript};
use clipcheck_retry::{retry_async, RetryConfig, RetryOutcome};

use crate::attempt::{classify_attempt, AttemptError};
use crate::error::{AnalysisResult, AnalysisStageError, SubStage};
use crate::prompt::call_llm_for_json;

const SCRIPT_PROMPT: &str = "Read the attached pass2_filtered segments and write a narrated \
compilation script: one intro section, then for every clip a pre_clip section introducing it, \
a video_clip section referencing its clip_id and timing, and a post_clip section reacting to it, \
then one outro section. Respond with JSON matching the unified_script schema, in play order.";

/// Builds the unified script from the pass-2 filtered set, regenerating on
/// structural or clip-reference invariant failure.
pub async fn run_script_generation(
    llm: &dyn Llm,
    pass2_path: &Path,
    pass2: &Pass2Analysis,
    retry_config: &RetryConfig,
) -> AnalysisResult<UnifiedScript> {
    let outcome = retry_async(retry_config, classify_attempt, |_attempt| async move {
        let script: UnifiedScript = call_llm_for_json(llm, SCRIPT_PROMPT, &[pass2_path]).await?;
        script.validate().map_err(AttemptError::Invariant)?;
        script.validate_clip_ids_against(pass2).map_err(AttemptError::Invariant)?;
        Ok(script)
    })
    .await;

    match outcome {
        RetryOutcome::Success(script) => Ok(script),
        RetryOutcome::Exhausted { error, .. } => {
            Err(AnalysisStageError::new(SubStage::ScriptGeneration, error.to_string()))
        },
    }
}
