//! Transcript artifact: the output of the diarizer adapter.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single speaker turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    /// Monotonic id, unique within the transcript.
    pub id: u32,
    pub speaker: String,
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl TranscriptSegment {
    fn validate(&self) -> Result<(), String> {
        if self.start < 0.0 {
            return Err(format!("segment {}: start {} is negative", self.id, self.start));
        }
        if !(self.start < self.end) {
            return Err(format!(
                "segment {}: start {} must be < end {}",
                self.id, self.start, self.end
            ));
        }
        Ok(())
    }
}

/// Ordered sequence of speaker turns, immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transcript {
    pub language: String,
    pub model_name: String,
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn total_segments(&self) -> usize {
        self.segments.len()
    }

    /// Checks the invariants from the data model: start < end per segment,
    /// monotonic id, and non-decreasing start across the sequence.
    pub fn validate(&self) -> Result<(), String> {
        let mut last_id: Option<u32> = None;
        let mut last_start = f64::MIN;
        for segment in &self.segments {
            segment.validate()?;
            if let Some(last_id) = last_id {
                if segment.id <= last_id {
                    return Err(format!(
                        "segment id {} is not monotonic after preceding id {}",
                        segment.id, last_id
                    ));
                }
            }
            if segment.start < last_start {
                return Err(format!(
                    "segment {} starts at {} which is before the preceding segment's start {}",
                    segment.id, segment.start, last_start
                ));
            }
            last_id = Some(segment.id);
            last_start = segment.start;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(id: u32, start: f64, end: f64) -> TranscriptSegment {
        TranscriptSegment { id, speaker: "A".into(), text: "hi".into(), start, end }
    }

    #[test]
    fn validate_accepts_ordered_segments() {
        let t = Transcript {
            language: "en".into(),
            model_name: "whisper-large".into(),
            segments: vec![segment(0, 0.0, 1.0), segment(1, 1.0, 2.5)],
        };
        assert!(t.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_order_segments() {
        let t = Transcript {
            language: "en".into(),
            model_name: "whisper-large".into(),
            segments: vec![segment(0, 2.0, 3.0), segment(1, 1.0, 1.5)],
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_monotonic_id() {
        let t = Transcript {
            language: "en".into(),
            model_name: "whisper-large".into(),
            segments: vec![segment(1, 0.0, 1.0), segment(1, 1.0, 2.0)],
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_duration_segment() {
        let t = Transcript {
            language: "en".into(),
            model_name: "whisper-large".into(),
            segments: vec![segment(0, 1.0, 1.0)],
        };
        assert!(t.validate().is_err());
    }
}
