//! Workspace error types.

use thiserror::Error;

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("invalid source reference: {0}")]
    InvalidSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("workspace busy: lock held at {0}")]
    Busy(String),

    #[error("unknown logical artifact name: {0}")]
    UnknownArtifact(String),
}

impl WorkspaceError {
    pub fn invalid_source(msg: impl Into<String>) -> Self {
        Self::InvalidSource(msg.into())
    }
}
