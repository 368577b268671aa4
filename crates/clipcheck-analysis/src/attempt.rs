//! Shared per-attempt error type and retry classification for the four
//! LLM-backed sub-stages. A single retry budget covers both transient
//! adapter failures and invariant/schema violations in the LLM's own
//! output (§4.6): either kind of failure consumes an attempt and triggers
//! regeneration, but a `Fatal`-classified adapter error (safety block,
//! malformed request) stops immediately.

use std::fmt;

use clipcheck_adapters::{LlmError, LlmErrorKind};
use clipcheck_retry::Classification;

#[derive(Debug)]
pub enum AttemptError {
    Llm(LlmError),
    /// The LLM's response parsed as JSON but violated a schema or
    /// cross-artifact invariant.
    Invariant(String),
    /// The response body was not valid JSON for the expected shape.
    Malformed(String),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Llm(e) => write!(f, "{e}"),
            AttemptError::Invariant(detail) => write!(f, "invariant violation: {detail}"),
            AttemptError::Malformed(detail) => write!(f, "malformed response: {detail}"),
        }
    }
}

/// Invariant and malformed-response failures are always worth regenerating;
/// adapter failures use the same kind-based classification as
/// `AdapterError::classify` (§4.4).
pub fn classify_attempt(error: &AttemptError) -> Classification {
    match error {
        AttemptError::Llm(e) => match e.kind {
            LlmErrorKind::RateLimit | LlmErrorKind::Network => Classification::Retriable,
            LlmErrorKind::Safety | LlmErrorKind::Malformed => Classification::Fatal,
        },
        AttemptError::Invariant(_) | AttemptError::Malformed(_) => Classification::Retriable,
    }
}
