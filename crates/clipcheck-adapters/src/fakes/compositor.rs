use std::path::Path;

use async_trait::async_trait;

use crate::error::ComposeError;
use crate::traits::{ComposeOutput, Compositor, OrderedSegment};

/// Concatenates the stub segment files in the order given (not sorted),
/// so a test that shuffles the input can assert composition preserves
/// caller-supplied ordering rather than re-deriving one.
pub struct FakeCompositor;

#[async_trait]
impl Compositor for FakeCompositor {
    async fn compose(&self, segments: &[OrderedSegment], out_path: &Path) -> Result<ComposeOutput, ComposeError> {
        let mut combined = Vec::new();
        for segment in segments {
            let path = match segment {
                OrderedSegment::Audio(p) | OrderedSegment::Video(p) => p,
            };
            let bytes = tokio::fs::read(path).await.map_err(|e| ComposeError(e.to_string()))?;
            combined.extend_from_slice(&bytes);
            combined.push(b'\n');
        }
        tokio::fs::write(out_path, &combined).await.map_err(|e| ComposeError(e.to_string()))?;

        Ok(ComposeOutput { duration_seconds: segments.len() as f64, bytes: combined.len() as u64 })
    }
}
