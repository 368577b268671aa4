//! Recorded adapter fakes for deterministic tests (§8 round-trip laws).
//!
//! These are not mocks of call expectations — they are fixed, in-memory
//! "recordings" that make the full pipeline deterministic and network-free,
//! the way a VCR-style fixture would, but hand-rolled since every adapter
//! here is a narrow trait rather than a single HTTP surface.

mod clipper;
mod compositor;
mod diarizer;
mod downloader;
mod llm;
mod tts;

pub use clipper::FakeClipper;
pub use compositor::FakeCompositor;
pub use diarizer::FakeDiarizer;
pub use downloader::FakeDownloader;
pub use llm::RecordedLlm;
pub use tts::FakeTts;
