use std::collections::VecDeque;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{LlmError, LlmErrorKind};
use crate::traits::{FileHandle, Llm};

/// Returns each queued response in order, one per `generate` call — a
/// recording of "pass1 said X, pass2 said Y, script said Z, verify said W".
/// `upload_file`/`delete_file` are no-ops that hand back a counting handle,
/// so tests can assert every upload was eventually deleted.
pub struct RecordedLlm {
    responses: Mutex<VecDeque<Vec<u8>>>,
    next_handle: Mutex<u64>,
}

impl RecordedLlm {
    pub fn new(responses: Vec<Vec<u8>>) -> Self {
        Self { responses: Mutex::new(responses.into()), next_handle: Mutex::new(0) }
    }
}

#[async_trait]
impl Llm for RecordedLlm {
    async fn upload_file(&self, _path: &Path) -> Result<FileHandle, LlmError> {
        let mut next = self.next_handle.lock().await;
        let handle = FileHandle(format!("handle-{next}"));
        *next += 1;
        Ok(handle)
    }

    async fn delete_file(&self, _handle: &FileHandle) -> Result<(), LlmError> {
        Ok(())
    }

    async fn generate(&self, _prompt: &str, _attachments: &[FileHandle]) -> Result<Vec<u8>, LlmError> {
        let mut responses = self.responses.lock().await;
        responses
            .pop_front()
            .ok_or_else(|| LlmError::new(LlmErrorKind::Network, "no more recorded responses"))
    }
}
