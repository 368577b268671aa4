use async_trait::async_trait;
use clipcheck_workspace::{LogicalName, Workspace};

use crate::error::DownloadError;
use crate::traits::{Downloader, FetchedMedia};

/// Writes fixed-content audio/video stand-ins into the workspace and
/// reports their paths, so downstream stages see real files without a
/// network call.
pub struct FakeDownloader {
    pub audio_bytes: Vec<u8>,
    pub video_bytes: Vec<u8>,
}

impl Default for FakeDownloader {
    fn default() -> Self {
        Self { audio_bytes: b"fake-audio".to_vec(), video_bytes: b"fake-video".to_vec() }
    }
}

#[async_trait]
impl Downloader for FakeDownloader {
    async fn fetch(&self, _source: &str, workspace: &Workspace) -> Result<FetchedMedia, DownloadError> {
        let audio_path = workspace.path_of(&LogicalName::OriginalAudio);
        let video_path = workspace.path_of(&LogicalName::OriginalVideo);

        tokio::fs::write(&audio_path, &self.audio_bytes)
            .await
            .map_err(|e| DownloadError::new(crate::error::DownloadErrorKind::Network, e.to_string()))?;
        tokio::fs::write(&video_path, &self.video_bytes)
            .await
            .map_err(|e| DownloadError::new(crate::error::DownloadErrorKind::Network, e.to_string()))?;

        Ok(FetchedMedia { audio_path, video_path })
    }
}
