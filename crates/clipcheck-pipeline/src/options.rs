//! Run options (§4.7): the stage range a run covers, the force flag,
//! per-run concurrency overrides, and the cancellation signal.

use clipcheck_models::StageName;
use clipcheck_retry::RetryConfig;

use crate::cancel::CancelSignal;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub start_from: StageName,
    pub stop_after: StageName,
    pub force: bool,
    pub tts_workers: Option<usize>,
    pub clip_workers: Option<usize>,
    pub retry: RetryConfig,
    pub cancel: CancelSignal,
}

impl RunOptions {
    pub fn new(cancel: CancelSignal) -> Self {
        Self {
            start_from: StageName::MediaExtraction,
            stop_after: StageName::Composition,
            force: false,
            tts_workers: None,
            clip_workers: None,
            retry: RetryConfig::default(),
            cancel,
        }
    }

    pub fn with_range(mut self, start_from: StageName, stop_after: StageName) -> Self {
        self.start_from = start_from;
        self.stop_after = stop_after;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Whether `stage` is within `[start_from, stop_after]` — run it and
    /// track it in the report.
    pub fn is_selected(&self, stage: StageName) -> bool {
        stage.ordinal() >= self.start_from.ordinal() && stage.ordinal() <= self.stop_after.ordinal()
    }

    /// Whether the run reaches `stage` at all. Stages before `start_from`
    /// still need their output read from cache; stages after `stop_after`
    /// are never touched.
    pub fn in_range(&self, stage: StageName) -> bool {
        stage.ordinal() <= self.stop_after.ordinal()
    }
}
