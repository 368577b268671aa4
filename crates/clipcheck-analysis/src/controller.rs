//! Ties the four sub-stages to the cache, exposing the two entry points
//! the pipeline orchestrator calls for stages 3 and 4 (§5).

use clipcheck_adapters::Llm;
use clipcheck_cache::{get, put_value, SchemaName};
use clipcheck_models::{Pass1Analysis, TwoPassConfig, VerifiedScript};
use clipcheck_retry::RetryConfig;
use clipcheck_workspace::{LogicalName, Workspace};
use tracing::info;

use crate::error::{AnalysisResult, AnalysisStageError, SubStage};
use crate::{pass1, pass2, script, verify};

/// Stage 3: content analysis pass 1. Cache-first — a hit makes no LLM call.
pub async fn run_pass1(
    workspace: &Workspace,
    llm: &dyn Llm,
    retry_config: &RetryConfig,
) -> AnalysisResult<Pass1Analysis> {
    if let Some(cached) = get(workspace, &LogicalName::Pass1Analysis, SchemaName::Pass1Analysis).await {
        info!("pass1_analysis cache hit");
        return Ok(cached.as_pass1().expect("schema matches requested artifact").clone());
    }

    let transcript_path = workspace.path_of(&LogicalName::Transcript);
    let analysis = pass1::run_pass1(llm, &transcript_path, retry_config).await?;

    put_value(workspace, &LogicalName::Pass1Analysis, &analysis, SchemaName::Pass1Analysis)
        .await
        .map_err(|e| AnalysisStageError::new(SubStage::Pass1Analysis, e.to_string()))?;

    Ok(analysis)
}

/// Stage 4: narrative generation. Runs pass 2 filtering, script generation,
/// and rebuttal verification in sequence, each cached independently so a
/// resumed run (`--from 4`) re-does only the sub-steps whose artifacts are
/// missing or invalid.
pub async fn run_filter_script_verify(
    workspace: &Workspace,
    llm: &dyn Llm,
    pass1_analysis: &Pass1Analysis,
    two_pass_config: &TwoPassConfig,
    retry_config: &RetryConfig,
) -> AnalysisResult<VerifiedScript> {
    let pass2_analysis = match get(workspace, &LogicalName::Pass2Filtered, SchemaName::Pass2Filtered).await {
        Some(cached) => {
            let pass2 = cached.as_pass2().expect("schema matches requested artifact").clone();
            if pass2.validate_subset_of(pass1_analysis).is_ok() {
                info!("pass2_filtered cache hit");
                pass2
            } else {
                run_pass2_fresh(workspace, llm, pass1_analysis, two_pass_config, retry_config).await?
            }
        },
        None => run_pass2_fresh(workspace, llm, pass1_analysis, two_pass_config, retry_config).await?,
    };

    let unified_script = match get(workspace, &LogicalName::UnifiedScript, SchemaName::UnifiedScript).await {
        Some(cached) => {
            let unified = cached.as_unified_script().expect("schema matches requested artifact").clone();
            if unified.validate_clip_ids_against(&pass2_analysis).is_ok() {
                info!("unified_script cache hit");
                unified
            } else {
                run_script_fresh(workspace, llm, &pass2_analysis, retry_config).await?
            }
        },
        None => run_script_fresh(workspace, llm, &pass2_analysis, retry_config).await?,
    };

    let verified_script = match get(workspace, &LogicalName::VerifiedScript, SchemaName::VerifiedScript).await {
        Some(cached) => {
            let verified = cached.as_verified_script().expect("schema matches requested artifact").clone();
            if verified.validate_preserves_structure_of(&unified_script).is_ok() {
                info!("verified_script cache hit");
                verified
            } else {
                run_verify_fresh(workspace, llm, &unified_script, &pass2_analysis, retry_config).await?
            }
        },
        None => run_verify_fresh(workspace, llm, &unified_script, &pass2_analysis, retry_config).await?,
    };

    Ok(verified_script)
}

async fn run_pass2_fresh(
    workspace: &Workspace,
    llm: &dyn Llm,
    pass1_analysis: &Pass1Analysis,
    two_pass_config: &TwoPassConfig,
    retry_config: &RetryConfig,
) -> AnalysisResult<clipcheck_models::Pass2Analysis> {
    let pass1_path = workspace.path_of(&LogicalName::Pass1Analysis);
    let pass2 = pass2::run_pass2(llm, &pass1_path, pass1_analysis, two_pass_config, retry_config).await?;
    put_value(workspace, &LogicalName::Pass2Filtered, &pass2, SchemaName::Pass2Filtered)
        .await
        .map_err(|e| AnalysisStageError::new(SubStage::Pass2QualityAssessment, e.to_string()))?;
    Ok(pass2)
}

async fn run_script_fresh(
    workspace: &Workspace,
    llm: &dyn Llm,
    pass2_analysis: &clipcheck_models::Pass2Analysis,
    retry_config: &RetryConfig,
) -> AnalysisResult<clipcheck_models::UnifiedScript> {
    let pass2_path = workspace.path_of(&LogicalName::Pass2Filtered);
    let unified = script::run_script_generation(llm, &pass2_path, pass2_analysis, retry_config).await?;
    put_value(workspace, &LogicalName::UnifiedScript, &unified, SchemaName::UnifiedScript)
        .await
        .map_err(|e| AnalysisStageError::new(SubStage::ScriptGeneration, e.to_string()))?;
    Ok(unified)
}

async fn run_verify_fresh(
    workspace: &Workspace,
    llm: &dyn Llm,
    unified_script: &clipcheck_models::UnifiedScript,
    pass2_analysis: &clipcheck_models::Pass2Analysis,
    retry_config: &RetryConfig,
) -> AnalysisResult<VerifiedScript> {
    let unified_path = workspace.path_of(&LogicalName::UnifiedScript);
    let pass2_path = workspace.path_of(&LogicalName::Pass2Filtered);
    let verified =
        verify::run_rebuttal_verification(llm, &unified_path, &pass2_path, unified_script, retry_config).await?;
    put_value(workspace, &LogicalName::VerifiedScript, &verified, SchemaName::VerifiedScript)
        .await
        .map_err(|e| AnalysisStageError::new(SubStage::RebuttalVerification, e.to_string()))?;
    Ok(verified)
}
