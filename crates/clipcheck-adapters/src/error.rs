//! Adapter error taxonomy (§4.5, §7), with the retriable/fatal
//! classification C4 consumes directly.

use clipcheck_retry::Classification;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadErrorKind {
    NotFound,
    Restricted,
    Network,
    Format,
}

#[derive(Debug, Error)]
#[error("download failed ({kind:?}): {message}")]
pub struct DownloadError {
    pub kind: DownloadErrorKind,
    pub message: String,
}

impl DownloadError {
    pub fn new(kind: DownloadErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

#[derive(Debug, Error)]
#[error("transcription failed: {0}")]
pub struct TranscriptError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    RateLimit,
    Safety,
    Network,
    Malformed,
}

#[derive(Debug, Error)]
#[error("LLM call failed ({kind:?}): {message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
}

impl LlmError {
    pub fn new(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

#[derive(Debug, Error)]
#[error("TTS synthesis failed: {0}")]
pub struct TtsError(pub String);

#[derive(Debug, Error)]
#[error("clip extraction failed: {0}")]
pub struct ClipError(pub String);

#[derive(Debug, Error)]
#[error("composition failed: {0}")]
pub struct ComposeError(pub String);

/// Uniform wrapper every adapter error can be converted into, so C4's
/// `classify` and C7's error surfacing both deal with one type.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Tts(#[from] TtsError),
    #[error(transparent)]
    Clip(#[from] ClipError),
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// Observed before making (or retrying) an adapter call (§5): not
    /// retriable, since retrying would defeat the cancellation itself.
    #[error("operation cancelled")]
    Cancelled,
}

impl AdapterError {
    /// Classification defaults (§4.4): transient I/O, timeouts, and LLM
    /// rate-limit signals are retriable; schema/malformed-input and
    /// quota-exhausted signals are fatal.
    pub fn classify(&self) -> Classification {
        match self {
            AdapterError::Download(e) => match e.kind {
                DownloadErrorKind::Network => Classification::Retriable,
                DownloadErrorKind::NotFound
                | DownloadErrorKind::Restricted
                | DownloadErrorKind::Format => Classification::Fatal,
            },
            AdapterError::Transcript(_) => Classification::Retriable,
            AdapterError::Llm(e) => match e.kind {
                LlmErrorKind::RateLimit | LlmErrorKind::Network => Classification::Retriable,
                LlmErrorKind::Safety | LlmErrorKind::Malformed => Classification::Fatal,
            },
            AdapterError::Tts(_) => Classification::Retriable,
            AdapterError::Clip(_) => Classification::Retriable,
            AdapterError::Compose(_) => Classification::Retriable,
            AdapterError::Cancelled => Classification::Fatal,
        }
    }
}
