//! Per-stage bodies: one adapter-backed function per stage, each wrapped in
//! retry and cache-aware (stages 3/4 delegate to `clipcheck_analysis`
//! directly and are not here).

use std::path::Path;

use clipcheck_adapters::{AdapterError, AdapterSet, OrderedSegment};
use clipcheck_models::{Section, SectionKind, StageName, VerifiedScript};
use clipcheck_retry::{retry_async, RetryConfig, RetryOutcome};
use clipcheck_workspace::{LogicalName, Workspace};
use tracing::warn;

use crate::cancel::CancelSignal;
use crate::error::{PipelineError, PipelineResult};
use crate::pool;

/// Deletes artifacts ahead of a forced re-run. A missing file is not an
/// error — the previous run may never have produced it.
pub(crate) async fn clear_artifacts(workspace: &Workspace, names: &[LogicalName]) {
    for name in names {
        let path = workspace.path_of(name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to clear artifact for forced regeneration");
            }
        }
    }
}

/// `None` entries are tasks the worker pool never started because
/// cancellation was observed at their worker-task boundary (§5).
fn first_error_or_cancelled(
    results: Vec<Option<Result<(), AdapterError>>>,
    stage: StageName,
) -> PipelineResult<()> {
    for result in results {
        match result {
            Some(Ok(())) => {},
            Some(Err(e)) => return Err(PipelineError::from_adapter(stage, e)),
            None => return Err(PipelineError::Cancelled { stage }),
        }
    }
    Ok(())
}

/// Stage 1: fetch original audio/video for `source` into the workspace.
pub async fn media_extraction(
    workspace: &Workspace,
    source: &str,
    adapters: &AdapterSet,
    retry: &RetryConfig,
    force: bool,
) -> PipelineResult<()> {
    if force {
        clear_artifacts(workspace, &[LogicalName::OriginalAudio, LogicalName::OriginalVideo]).await;
    }
    if workspace.exists(&LogicalName::OriginalAudio).await && workspace.exists(&LogicalName::OriginalVideo).await {
        return Ok(());
    }

    let outcome = retry_async(retry, |e: &AdapterError| e.classify(), |_attempt| async {
        adapters.downloader.fetch(source, workspace).await.map_err(AdapterError::from)
    })
    .await;

    match outcome {
        RetryOutcome::Success(_) => Ok(()),
        RetryOutcome::Exhausted { error, .. } => Err(PipelineError::from_adapter(StageName::MediaExtraction, error)),
    }
}

/// Stage 2: diarize the original audio into a transcript, cached like any
/// other schema-validated artifact.
pub async fn transcription(
    workspace: &Workspace,
    adapters: &AdapterSet,
    retry: &RetryConfig,
    force: bool,
) -> PipelineResult<()> {
    use clipcheck_cache::{get, put_value, SchemaName};

    if force {
        clear_artifacts(workspace, &[LogicalName::Transcript]).await;
    }
    if get(workspace, &LogicalName::Transcript, SchemaName::Transcript).await.is_some() {
        return Ok(());
    }

    let audio_path = workspace.path_of(&LogicalName::OriginalAudio);
    let outcome = retry_async(retry, |e: &AdapterError| e.classify(), |_attempt| async {
        adapters.diarizer.diarize(&audio_path).await.map_err(AdapterError::from)
    })
    .await;

    let transcript = match outcome {
        RetryOutcome::Success(t) => t,
        RetryOutcome::Exhausted { error, .. } => {
            return Err(PipelineError::from_adapter(StageName::Transcription, error));
        },
    };

    put_value(workspace, &LogicalName::Transcript, &transcript, SchemaName::Transcript)
        .await
        .map_err(|e| PipelineError::from_cache(StageName::Transcription, e))
}

fn audio_tone(section: &Section) -> &str {
    match section {
        Section::Intro { audio_tone, .. }
        | Section::PreClip { audio_tone, .. }
        | Section::PostClip { audio_tone, .. }
        | Section::Outro { audio_tone, .. } => audio_tone,
        Section::VideoClip { .. } => unreachable!("video_clip sections carry no audio_tone"),
    }
}

async fn synthesize_one(
    workspace: &Workspace,
    section: &Section,
    adapters: &AdapterSet,
    retry: &RetryConfig,
    cancel: &CancelSignal,
) -> Result<(), AdapterError> {
    let logical = LogicalName::OutputAudio(section.section_id().to_string());
    if workspace.exists(&logical).await {
        return Ok(());
    }

    let text = section.script_content().expect("narration sections always carry script_content").to_string();
    let tone = audio_tone(section).to_string();

    let outcome = retry_async(retry, |e: &AdapterError| e.classify(), |_attempt| async {
        if cancel.is_cancelled() {
            return Err(AdapterError::Cancelled);
        }
        adapters.tts.synthesize(&text, &tone).await.map_err(AdapterError::from)
    })
    .await;

    match outcome {
        RetryOutcome::Success(bytes) => workspace
            .write_atomic(&logical, &bytes)
            .await
            .map_err(|e| AdapterError::Tts(clipcheck_adapters::TtsError(e.to_string()))),
        RetryOutcome::Exhausted { error, .. } => Err(error),
    }
}

/// Stage 5: synthesize narration audio for every non-`video_clip` section,
/// bounded by `workers` concurrent TTS calls.
pub async fn audio_generation(
    workspace: &Workspace,
    verified_script: &VerifiedScript,
    adapters: &AdapterSet,
    retry: &RetryConfig,
    workers: usize,
    force: bool,
    cancel: &CancelSignal,
) -> PipelineResult<()> {
    let narration_sections: Vec<&Section> =
        verified_script.sections.iter().filter(|s| s.script_content().is_some()).collect();

    if force {
        let names: Vec<LogicalName> =
            narration_sections.iter().map(|s| LogicalName::OutputAudio(s.section_id().to_string())).collect();
        clear_artifacts(workspace, &names).await;
    }

    let results = pool::run_bounded(narration_sections, workers, cancel, |_idx, section| async move {
        synthesize_one(workspace, section, adapters, retry, cancel).await
    })
    .await;

    first_error_or_cancelled(results, StageName::AudioGeneration)
}

async fn clip_one(
    workspace: &Workspace,
    video_path: &Path,
    section: &Section,
    adapters: &AdapterSet,
    retry: &RetryConfig,
    cancel: &CancelSignal,
) -> Result<(), AdapterError> {
    let (start_time, end_time) = match section {
        Section::VideoClip { start_time, end_time, .. } => (*start_time, *end_time),
        _ => unreachable!("clip sections are always video_clip"),
    };

    let logical = LogicalName::OutputVideo(section.section_id().to_string());
    if workspace.exists(&logical).await {
        return Ok(());
    }
    let out_path = workspace.path_of(&logical);

    let outcome = retry_async(retry, |e: &AdapterError| e.classify(), |_attempt| async {
        if cancel.is_cancelled() {
            return Err(AdapterError::Cancelled);
        }
        adapters.clipper.clip(video_path, start_time, end_time, &out_path).await.map_err(AdapterError::from)
    })
    .await;

    match outcome {
        RetryOutcome::Success(_) => Ok(()),
        RetryOutcome::Exhausted { error, .. } => Err(error),
    }
}

/// Stage 6: cut one video clip per `video_clip` section from the original
/// source video, bounded by `workers` concurrent clip extractions.
pub async fn video_clipping(
    workspace: &Workspace,
    verified_script: &VerifiedScript,
    video_path: &Path,
    adapters: &AdapterSet,
    retry: &RetryConfig,
    workers: usize,
    force: bool,
    cancel: &CancelSignal,
) -> PipelineResult<()> {
    let clip_sections: Vec<&Section> =
        verified_script.sections.iter().filter(|s| s.kind() == SectionKind::VideoClip).collect();

    if force {
        let names: Vec<LogicalName> =
            clip_sections.iter().map(|s| LogicalName::OutputVideo(s.section_id().to_string())).collect();
        clear_artifacts(workspace, &names).await;
    }

    let results = pool::run_bounded(clip_sections, workers, cancel, |_idx, section| async move {
        clip_one(workspace, video_path, section, adapters, retry, cancel).await
    })
    .await;

    first_error_or_cancelled(results, StageName::VideoClipping)
}

/// The final composed output's filename, `<episode>_final.mp4` (§3, §6).
pub fn final_output_name(episode_id: &clipcheck_models::EpisodeId) -> String {
    format!("{}_final.mp4", episode_id.as_str())
}

/// Stage 7: stitch the per-section audio/video outputs into the final
/// video, in verified-script order.
pub async fn composition(
    workspace: &Workspace,
    verified_script: &VerifiedScript,
    adapters: &AdapterSet,
    retry: &RetryConfig,
    force: bool,
) -> PipelineResult<()> {
    let logical = LogicalName::OutputFinal(final_output_name(&workspace.episode().id));

    if force {
        clear_artifacts(workspace, &[logical.clone()]).await;
    }
    if workspace.exists(&logical).await {
        return Ok(());
    }

    let segments: Vec<OrderedSegment> = verified_script
        .sections
        .iter()
        .map(|section| match section.kind() {
            SectionKind::VideoClip => {
                OrderedSegment::Video(workspace.path_of(&LogicalName::OutputVideo(section.section_id().to_string())))
            },
            _ => {
                OrderedSegment::Audio(workspace.path_of(&LogicalName::OutputAudio(section.section_id().to_string())))
            },
        })
        .collect();

    let out_path = workspace.path_of(&logical);
    let outcome = retry_async(retry, |e: &AdapterError| e.classify(), |_attempt| async {
        adapters.compositor.compose(&segments, &out_path).await.map_err(AdapterError::from)
    })
    .await;

    match outcome {
        RetryOutcome::Success(_) => Ok(()),
        RetryOutcome::Exhausted { error, .. } => Err(PipelineError::from_adapter(StageName::Composition, error)),
    }
}
