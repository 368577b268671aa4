//! The six narrow adapter interfaces the core depends on (§4.5).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clipcheck_models::Transcript;
use clipcheck_workspace::Workspace;

use crate::error::{ClipError, ComposeError, DownloadError, LlmError, TranscriptError, TtsError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMedia {
    pub audio_path: PathBuf,
    pub video_path: PathBuf,
}

#[async_trait]
pub trait Downloader: Send + Sync {
    async fn fetch(&self, source: &str, workspace: &Workspace) -> Result<FetchedMedia, DownloadError>;
}

#[async_trait]
pub trait Diarizer: Send + Sync {
    async fn diarize(&self, audio_path: &Path) -> Result<Transcript, TranscriptError>;
}

/// Opaque handle to an uploaded file, returned by [`Llm::upload_file`] and
/// consumed by [`Llm::generate`]/[`Llm::delete_file`]. Large inputs travel
/// by handle, never inline, so prompts stay small (§4.5, §4.6).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle(pub String);

#[async_trait]
pub trait Llm: Send + Sync {
    async fn upload_file(&self, path: &Path) -> Result<FileHandle, LlmError>;
    async fn delete_file(&self, handle: &FileHandle) -> Result<(), LlmError>;
    async fn generate(&self, prompt: &str, attachments: &[FileHandle]) -> Result<Vec<u8>, LlmError>;
}

#[async_trait]
pub trait Tts: Send + Sync {
    async fn synthesize(&self, text: &str, tone: &str) -> Result<Vec<u8>, TtsError>;
}

#[async_trait]
pub trait Clipper: Send + Sync {
    async fn clip(&self, video_path: &Path, start: f64, end: f64, out_path: &Path) -> Result<(), ClipError>;
}

/// One element of the ordered sequence the compositor stitches together,
/// in verified-script order (§5 "Ordering guarantees").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderedSegment {
    Audio(PathBuf),
    Video(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposeOutput {
    pub duration_seconds: f64,
    pub bytes: u64,
}

#[async_trait]
pub trait Compositor: Send + Sync {
    async fn compose(&self, segments: &[OrderedSegment], out_path: &Path) -> Result<ComposeOutput, ComposeError>;
}

/// The full set of adapters a pipeline run needs, grouped so the
/// orchestrator can take one dependency-injected bundle instead of six
/// separate constructor arguments.
pub struct AdapterSet {
    pub downloader: Box<dyn Downloader>,
    pub diarizer: Box<dyn Diarizer>,
    pub llm: Box<dyn Llm>,
    pub tts: Box<dyn Tts>,
    pub clipper: Box<dyn Clipper>,
    pub compositor: Box<dyn Compositor>,
}
