//! Pipeline Orchestrator (C7): runs the seven stages in order, threading
//! each stage's output into the next, cache-first throughout.

use std::path::Path;

use clipcheck_adapters::AdapterSet;
use clipcheck_models::{PipelineConfig, RunReport, SessionId, StageName, StageState};
use clipcheck_workspace::{LogicalName, Workspace};
use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::options::RunOptions;
use crate::progress::ProgressRecorder;
use crate::stages;

/// Bookkeeping shared by every stage: the run report, the session log, and
/// the `begin`/`finish` bracket around each stage body.
struct StageRunner<'a> {
    report: RunReport,
    recorder: ProgressRecorder,
    workspace: &'a Workspace,
    options: &'a RunOptions,
}

impl<'a> StageRunner<'a> {
    fn new(workspace: &'a Workspace, options: &'a RunOptions, session_id: SessionId) -> Self {
        Self {
            report: RunReport::new(session_id.to_string()),
            recorder: ProgressRecorder::new(session_id),
            workspace,
            options,
        }
    }

    /// `Ok(true)`: the stage is selected — run it and track the result via
    /// [`finish`]. `Ok(false)`: the stage is before `start_from` and assumed
    /// already complete from a prior run; reported `Done` with `cached=true`
    /// rather than a separate state (§8 scenario 2), and its output still
    /// needs to be obtained (from cache) by the caller. `Err`: cancellation
    /// observed before reaching this stage.
    async fn begin(&mut self, stage: StageName) -> PipelineResult<bool> {
        if !self.options.is_selected(stage) {
            self.report.stage_mut(stage).complete_cached();
            self.recorder.emit_cached_complete(self.workspace, stage).await;
            return Ok(false);
        }
        if self.options.cancel.is_cancelled() {
            self.report.stage_mut(stage).fail_cancelled();
            self.recorder
                .emit_transition(self.workspace, stage, StageState::Failed, 0, Some("cancelled".into()))
                .await;
            return Err(PipelineError::Cancelled { stage });
        }

        self.report.stage_mut(stage).start();
        self.recorder.emit_transition(self.workspace, stage, StageState::Running, 0, None).await;
        Ok(true)
    }

    async fn finish<T>(&mut self, stage: StageName, result: PipelineResult<T>) -> PipelineResult<T> {
        match &result {
            Ok(_) => {
                self.report.stage_mut(stage).complete();
                self.recorder.emit_transition(self.workspace, stage, StageState::Done, 100, None).await;
            },
            Err(e) => {
                self.report.stage_mut(stage).fail(e.to_string());
                self.recorder
                    .emit_transition(self.workspace, stage, StageState::Failed, 0, Some(e.to_string()))
                    .await;
            },
        }
        result
    }
}

/// Locates and runs the episode referenced by `source` through the stage
/// range `options` selects, returning the per-stage report. A stage before
/// `options.start_from` is assumed already complete: its output is read
/// back (cache-first, so a still-missing artifact is regenerated rather
/// than treated as an error) without appearing as `Running` in the report.
pub async fn run(
    source: &str,
    options: &RunOptions,
    adapters: &AdapterSet,
    config: &PipelineConfig,
) -> PipelineResult<RunReport> {
    let episode = clipcheck_workspace::locate(source).map_err(|e| PipelineError::InvalidSource(e.to_string()))?;
    let workspace = Workspace::ensure(Path::new(&config.paths.content_root), episode).await?;
    info!(episode = %workspace.episode().id, "pipeline run starting");

    let mut runner = StageRunner::new(&workspace, options, SessionId::new());

    if !options.in_range(StageName::MediaExtraction) {
        return Ok(runner.report);
    }
    if runner.begin(StageName::MediaExtraction).await? {
        let result = stages::media_extraction(&workspace, source, adapters, &options.retry, options.force).await;
        runner.finish(StageName::MediaExtraction, result).await?;
    } else {
        stages::media_extraction(&workspace, source, adapters, &options.retry, false).await?;
    }

    if !options.in_range(StageName::Transcription) {
        return Ok(runner.report);
    }
    if runner.begin(StageName::Transcription).await? {
        let result = stages::transcription(&workspace, adapters, &options.retry, options.force).await;
        runner.finish(StageName::Transcription, result).await?;
    } else {
        stages::transcription(&workspace, adapters, &options.retry, false).await?;
    }

    if !options.in_range(StageName::ContentAnalysisPass1) {
        return Ok(runner.report);
    }
    let pass1_tracked = runner.begin(StageName::ContentAnalysisPass1).await?;
    if pass1_tracked && options.force {
        stages::clear_artifacts(&workspace, &[LogicalName::Pass1Analysis]).await;
    }
    let pass1_outcome = clipcheck_analysis::run_pass1(&workspace, adapters.llm.as_ref(), &options.retry)
        .await
        .map_err(PipelineError::from_analysis);
    let pass1_analysis =
        if pass1_tracked { runner.finish(StageName::ContentAnalysisPass1, pass1_outcome).await? } else { pass1_outcome? };

    if !options.in_range(StageName::NarrativeGeneration) {
        return Ok(runner.report);
    }
    let narrative_tracked = runner.begin(StageName::NarrativeGeneration).await?;
    if narrative_tracked && options.force {
        stages::clear_artifacts(
            &workspace,
            &[LogicalName::Pass2Filtered, LogicalName::UnifiedScript, LogicalName::VerifiedScript],
        )
        .await;
    }
    let narrative_outcome = clipcheck_analysis::run_filter_script_verify(
        &workspace,
        adapters.llm.as_ref(),
        &pass1_analysis,
        &config.two_pass,
        &options.retry,
    )
    .await
    .map_err(PipelineError::from_analysis);
    let verified_script = if narrative_tracked {
        runner.finish(StageName::NarrativeGeneration, narrative_outcome).await?
    } else {
        narrative_outcome?
    };

    if !options.in_range(StageName::AudioGeneration) {
        return Ok(runner.report);
    }
    let tts_workers = options.tts_workers.unwrap_or(config.concurrency.tts_workers);
    if runner.begin(StageName::AudioGeneration).await? {
        let result = stages::audio_generation(
            &workspace,
            &verified_script,
            adapters,
            &options.retry,
            tts_workers,
            options.force,
            &options.cancel,
        )
        .await;
        runner.finish(StageName::AudioGeneration, result).await?;
    } else {
        stages::audio_generation(
            &workspace,
            &verified_script,
            adapters,
            &options.retry,
            tts_workers,
            false,
            &options.cancel,
        )
        .await?;
    }

    if !options.in_range(StageName::VideoClipping) {
        return Ok(runner.report);
    }
    let clip_workers = options.clip_workers.unwrap_or(config.concurrency.clip_workers);
    let video_path = workspace.path_of(&LogicalName::OriginalVideo);
    if runner.begin(StageName::VideoClipping).await? {
        let result = stages::video_clipping(
            &workspace,
            &verified_script,
            &video_path,
            adapters,
            &options.retry,
            clip_workers,
            options.force,
            &options.cancel,
        )
        .await;
        runner.finish(StageName::VideoClipping, result).await?;
    } else {
        stages::video_clipping(
            &workspace,
            &verified_script,
            &video_path,
            adapters,
            &options.retry,
            clip_workers,
            false,
            &options.cancel,
        )
        .await?;
    }

    if !options.in_range(StageName::Composition) {
        return Ok(runner.report);
    }
    if runner.begin(StageName::Composition).await? {
        let result = stages::composition(&workspace, &verified_script, adapters, &options.retry, options.force).await;
        runner.finish(StageName::Composition, result).await?;
    } else {
        stages::composition(&workspace, &verified_script, adapters, &options.retry, false).await?;
    }

    info!(episode = %workspace.episode().id, "pipeline run complete");
    Ok(runner.report)
}
