//! Episode identity.

use std::fmt;

/// A stable, filesystem-safe label derived from a source reference.
///
/// Two different source strings that point at the same logical episode
/// (e.g. the same URL with different query params) are expected to
/// normalize to the same label, though normalization itself is a concern
/// of the workspace crate, not this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EpisodeId(pub String);

impl EpisodeId {
    pub fn from_label(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to an episode, resolved from a source but not yet backed by
/// a directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRef {
    pub id: EpisodeId,
    pub source: String,
}

impl EpisodeRef {
    pub fn new(id: EpisodeId, source: impl Into<String>) -> Self {
        Self { id, source: source.into() }
    }
}
