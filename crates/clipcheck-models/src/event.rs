//! Session-scoped progress events (C8, §4.8).

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::stage::{StageName, StageState};

/// Session id: time + random, unique per pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(format!("{}-{}", Utc::now().format("%Y%m%dT%H%M%SZ"), uuid::Uuid::new_v4()))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One record in the append-only, newline-delimited session log.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProgressEvent {
    pub session_id: SessionId,
    pub stage: StageName,
    pub state: StageState,
    pub progress_pct: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Set on a `Done` event produced by a cache hit rather than a fresh
    /// adapter run (§8 scenario 2: "events `complete` with `cached=true`").
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cached: bool,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn new(
        session_id: SessionId,
        stage: StageName,
        state: StageState,
        progress_pct: u8,
        message: Option<String>,
    ) -> Self {
        Self::with_cached(session_id, stage, state, progress_pct, message, false)
    }

    pub fn with_cached(
        session_id: SessionId,
        stage: StageName,
        state: StageState,
        progress_pct: u8,
        message: Option<String>,
        cached: bool,
    ) -> Self {
        Self { session_id, stage, state, progress_pct: progress_pct.min(100), message, cached, timestamp: Utc::now() }
    }
}
