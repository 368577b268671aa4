//! Builds the `AdapterSet` the orchestrator runs against.
//!
//! Downloader, diarizer, LLM, TTS, clipper, and compositor are named only
//! by the interface the core consumes (§1 Non-goals: "media downloader,
//! diarizer, LLM client, TTS engine, video clipper, compositor... out of
//! scope, named only by the interface the core consumes"). Real network/
//! ffmpeg/model-backed implementations of those six are a separate,
//! deliberately out-of-scope deliverable; this binary wires the same
//! recorded fakes the test suite uses behind one constructor, so swapping
//! in real backends later only means changing `build`, not anything that
//! calls it.

use clipcheck_adapters::fakes::{FakeClipper, FakeCompositor, FakeDiarizer, FakeDownloader, FakeTts, RecordedLlm};
use clipcheck_adapters::AdapterSet;
use clipcheck_models::{Transcript, TranscriptSegment};

/// A transcript stand-in used until a real diarizer is wired in; keeps the
/// binary runnable end to end against the pipeline's cache-first flow.
fn placeholder_transcript() -> Transcript {
    Transcript {
        language: "en".into(),
        model_name: "placeholder".into(),
        segments: vec![TranscriptSegment {
            id: 0,
            speaker: "unknown".into(),
            text: String::new(),
            start: 0.0,
            end: 0.0,
        }],
    }
}

/// `llm` carries no recorded responses: a run that reaches stage 3 or 4
/// will fail there with "no more recorded responses" rather than silently
/// fabricating analysis. That's the honest behavior of a fakes-backed LLM
/// adapter with nothing queued, not a bug — a real `Llm` implementation is
/// the thing a production deployment supplies in place of `build()`.
pub fn build() -> AdapterSet {
    AdapterSet {
        downloader: Box::new(FakeDownloader::default()),
        diarizer: Box::new(FakeDiarizer::new(placeholder_transcript())),
        llm: Box::new(RecordedLlm::new(Vec::new())),
        tts: Box::new(FakeTts),
        clipper: Box::new(FakeClipper),
        compositor: Box::new(FakeCompositor),
    }
}
