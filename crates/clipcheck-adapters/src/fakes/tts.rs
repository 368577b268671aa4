use async_trait::async_trait;

use crate::error::TtsError;
use crate::traits::Tts;

/// Returns a fixed-length byte buffer proportional to the text length, so
/// tests can assert narration "duration" deterministically without a real
/// synthesizer.
pub struct FakeTts;

#[async_trait]
impl Tts for FakeTts {
    async fn synthesize(&self, text: &str, _tone: &str) -> Result<Vec<u8>, TtsError> {
        Ok(vec![0u8; text.len().max(1)])
    }
}
