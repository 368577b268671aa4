use async_trait::async_trait;
use clipcheck_models::Transcript;
use std::path::Path;

use crate::error::TranscriptError;
use crate::traits::Diarizer;

/// Always returns the same, fixed transcript regardless of input path.
pub struct FakeDiarizer {
    pub transcript: Transcript,
}

impl FakeDiarizer {
    pub fn new(transcript: Transcript) -> Self {
        Self { transcript }
    }
}

#[async_trait]
impl Diarizer for FakeDiarizer {
    async fn diarize(&self, _audio_path: &Path) -> Result<Transcript, TranscriptError> {
        Ok(self.transcript.clone())
    }
}
