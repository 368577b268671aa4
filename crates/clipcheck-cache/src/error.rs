//! Cache/validator error types.

use thiserror::Error;

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("schema validation failed for {schema}: {detail}")]
    Validation { schema: &'static str, detail: String },

    #[error("workspace error: {0}")]
    Workspace(#[from] clipcheck_workspace::WorkspaceError),

    #[error("artifact is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl CacheError {
    pub fn validation(schema: &'static str, detail: impl Into<String>) -> Self {
        Self::Validation { schema, detail: detail.into() }
    }
}
