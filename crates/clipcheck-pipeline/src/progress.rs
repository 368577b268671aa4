//! Session Log & Progress Events (C8): append-only NDJSON session log, plus
//! throttled/deduplicated event emission (§4.8).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use clipcheck_models::{ProgressEvent, SessionId, StageName, StageState};
use clipcheck_workspace::{LogicalName, Workspace};
use tokio::sync::Mutex;
use tracing::{info, warn};

const MIN_PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

struct LastEmitted {
    state: StageState,
    progress_pct: u8,
    at: Instant,
}

/// Serializes session-log appends (concurrent worker-pool stages emit
/// events from multiple tasks) and applies the monotonic/deduplication
/// policy before writing.
pub struct ProgressRecorder {
    session_id: SessionId,
    last: Mutex<HashMap<StageName, LastEmitted>>,
}

impl ProgressRecorder {
    pub fn new(session_id: SessionId) -> Self {
        Self { session_id, last: Mutex::new(HashMap::new()) }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Emits a stage-transition event (start/complete/fail/skip) unconditionally.
    pub async fn emit_transition(
        &self,
        workspace: &Workspace,
        stage: StageName,
        state: StageState,
        progress_pct: u8,
        message: Option<String>,
    ) {
        self.record(workspace, stage, state, progress_pct, message, false).await;
    }

    /// A stage reached `Done` via a cache hit rather than a fresh adapter
    /// run: reported `Done` with `cached=true` (§8 scenario 2), not as a
    /// separate state.
    pub async fn emit_cached_complete(&self, workspace: &Workspace, stage: StageName) {
        self.record(workspace, stage, StageState::Done, 100, None, true).await;
    }

    /// Emits a progress update for a running stage, throttled to at most
    /// once per [`MIN_PROGRESS_INTERVAL`] and only when progress advanced
    /// (§4.8: "progress percentages are monotonic...clamped and deduplicated").
    pub async fn emit_progress(&self, workspace: &Workspace, stage: StageName, progress_pct: u8) {
        let progress_pct = progress_pct.min(100);
        {
            let last = self.last.lock().await;
            if let Some(prev) = last.get(&stage) {
                if progress_pct <= prev.progress_pct {
                    return;
                }
                if prev.at.elapsed() < MIN_PROGRESS_INTERVAL {
                    return;
                }
            }
        }
        self.record(workspace, stage, StageState::Running, progress_pct, None, false).await;
    }

    async fn record(
        &self,
        workspace: &Workspace,
        stage: StageName,
        state: StageState,
        progress_pct: u8,
        message: Option<String>,
        cached: bool,
    ) {
        let progress_pct = progress_pct.min(100);
        {
            let mut last = self.last.lock().await;
            last.insert(stage, LastEmitted { state, progress_pct, at: Instant::now() });
        }

        let event = ProgressEvent::with_cached(self.session_id.clone(), stage, state, progress_pct, message, cached);
        info!(stage = stage.as_str(), ?state, progress_pct, cached, "stage event");
        append_event(workspace, &self.session_id, &event).await;
    }
}

async fn append_event(workspace: &Workspace, session_id: &SessionId, event: &ProgressEvent) {
    let logical = LogicalName::SessionLog(session_id.0.clone());

    let mut bytes = if workspace.exists(&logical).await {
        tokio::fs::read(workspace.path_of(&logical)).await.unwrap_or_default()
    } else {
        Vec::new()
    };

    match serde_json::to_vec(event) {
        Ok(mut line) => {
            bytes.append(&mut line);
            bytes.push(b'\n');
        },
        Err(e) => {
            warn!(error = %e, "failed to serialize progress event");
            return;
        },
    }

    if let Err(e) = workspace.write_atomic(&logical, &bytes).await {
        warn!(error = %e, "failed to append to session log");
    }
}
