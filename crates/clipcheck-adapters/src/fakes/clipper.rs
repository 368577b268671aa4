use std::path::Path;

use async_trait::async_trait;

use crate::error::ClipError;
use crate::traits::Clipper;

/// Writes a stub clip file whose byte length encodes the requested
/// duration, so a test compositor fake can report plausible durations
/// without decoding real media.
pub struct FakeClipper;

#[async_trait]
impl Clipper for FakeClipper {
    async fn clip(&self, _video_path: &Path, start: f64, end: f64, out_path: &Path) -> Result<(), ClipError> {
        let duration = (end - start).max(0.0);
        let stub = format!("clip duration={duration:.3}");
        tokio::fs::write(out_path, stub.as_bytes()).await.map_err(|e| ClipError(e.to_string()))?;
        Ok(())
    }
}
