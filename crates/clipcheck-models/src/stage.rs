//! Stage records: the orchestrator's process-wide bookkeeping for one run.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    MediaExtraction,
    Transcription,
    ContentAnalysisPass1,
    NarrativeGeneration,
    AudioGeneration,
    VideoClipping,
    Composition,
}

impl StageName {
    /// Stages in run order, 1-indexed to match the CLI's `--stages`/`--from`/`--to` surface.
    pub const ORDERED: [StageName; 7] = [
        StageName::MediaExtraction,
        StageName::Transcription,
        StageName::ContentAnalysisPass1,
        StageName::NarrativeGeneration,
        StageName::AudioGeneration,
        StageName::VideoClipping,
        StageName::Composition,
    ];

    pub fn ordinal(&self) -> u8 {
        Self::ORDERED.iter().position(|s| s == self).expect("stage is in ORDERED") as u8 + 1
    }

    pub fn from_ordinal(n: u8) -> Option<StageName> {
        if n == 0 {
            return None;
        }
        Self::ORDERED.get((n - 1) as usize).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::MediaExtraction => "media_extraction",
            StageName::Transcription => "transcription",
            StageName::ContentAnalysisPass1 => "content_analysis_pass1",
            StageName::NarrativeGeneration => "narrative_generation",
            StageName::AudioGeneration => "audio_generation",
            StageName::VideoClipping => "video_clipping",
            StageName::Composition => "composition",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    #[default]
    Pending,
    Running,
    Done,
    Failed,
    Skipped,
}

impl StageState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageState::Done | StageState::Failed | StageState::Skipped)
    }
}

/// An artifact produced or touched by a stage, recorded for the run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactRef {
    pub logical_name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StageRecord {
    pub name: StageName,
    pub state: StageState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactRef>,
    pub progress_pct: u8,
    /// Set when this stage's `Failed` state was reached via cancellation
    /// rather than an adapter/invariant error (§5 cancellation semantics).
    #[serde(default)]
    pub cancelled: bool,
    /// Set when this stage reached `Done` via a cache hit — either because
    /// its own artifact already existed, or because it sits before the run's
    /// `--from` bound and is assumed already complete (§8 scenario 2).
    #[serde(default)]
    pub cached: bool,
}

impl StageRecord {
    pub fn pending(name: StageName) -> Self {
        Self {
            name,
            state: StageState::Pending,
            started_at: None,
            ended_at: None,
            error: None,
            artifacts: Vec::new(),
            progress_pct: 0,
            cancelled: false,
            cached: false,
        }
    }

    pub fn start(&mut self) {
        self.state = StageState::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn complete(&mut self) {
        self.state = StageState::Done;
        self.ended_at = Some(Utc::now());
        self.progress_pct = 100;
    }

    /// A stage assumed already complete from a prior run (before `--from`)
    /// or whose own artifact already existed: reported `Done` with `cached`
    /// set, not a distinct terminal state (§8 scenario 2).
    pub fn complete_cached(&mut self) {
        self.complete();
        self.cached = true;
    }

    pub fn skip(&mut self) {
        self.state = StageState::Skipped;
        self.progress_pct = 100;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = StageState::Failed;
        self.ended_at = Some(Utc::now());
        self.error = Some(error.into());
    }

    /// A cancellation reached this stage while it was running: the active
    /// adapter call was allowed to return naturally, then the stage is
    /// marked failed-via-cancellation rather than scheduling the next one.
    pub fn fail_cancelled(&mut self) {
        self.fail("cancelled");
        self.cancelled = true;
    }

    /// Clamp and only move forward: progress events are monotonic within a
    /// stage (§4.8).
    pub fn set_progress(&mut self, pct: u8) {
        let pct = pct.min(100);
        if pct > self.progress_pct {
            self.progress_pct = pct;
        }
    }
}

/// The full bookkeeping for one pipeline run, in stage order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunReport {
    pub session_id: String,
    pub stages: Vec<StageRecord>,
}

impl RunReport {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            stages: StageName::ORDERED.iter().map(|s| StageRecord::pending(*s)).collect(),
        }
    }

    pub fn stage_mut(&mut self, name: StageName) -> &mut StageRecord {
        self.stages.iter_mut().find(|s| s.name == name).expect("every StageName has a record")
    }

    pub fn succeeded(&self) -> bool {
        self.stages.iter().all(|s| matches!(s.state, StageState::Done | StageState::Skipped))
    }
}
