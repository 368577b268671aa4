//! External Adapters (C5): narrow interfaces to the downloader, diarizer,
//! LLM, TTS, clipper, and compositor, plus recorded fakes for tests.

pub mod error;
pub mod fakes;
pub mod traits;

pub use error::{
    AdapterError, ClipError, ComposeError, DownloadError, DownloadErrorKind, LlmError, LlmErrorKind,
    TranscriptError, TtsError,
};
pub use traits::{
    AdapterSet, Clipper, ComposeOutput, Compositor, Diarizer, Downloader, FetchedMedia, FileHandle, Llm,
    OrderedSegment, Tts,
};
