//! Pass-1 and pass-2 content-analysis artifacts.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Advisory severity rating from pass 1. Discarded by pass 2 (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvidenceQuote {
    pub timestamp: f64,
    pub speaker: String,
    pub quote: String,
}

/// A candidate segment surfaced by pass 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pass1Segment {
    pub segment_id: String,
    pub title: String,
    pub severity: Severity,
    pub harm_category: String,
    pub evidence: Vec<EvidenceQuote>,
    pub context: String,
    pub confidence: f64,
    pub duration_seconds: f64,
    pub context_start: f64,
    pub context_end: f64,
}

/// Broad candidate set produced by pass 1, capped at a configurable maximum
/// (default 20).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pass1Analysis {
    pub segments: Vec<Pass1Segment>,
}

impl Pass1Analysis {
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for segment in &self.segments {
            if !seen.insert(segment.segment_id.as_str()) {
                return Err(format!("duplicate segment_id {}", segment.segment_id));
            }
            if !(segment.start_start_end_ok()) {
                return Err(format!(
                    "segment {}: context_start {} must be < context_end {}",
                    segment.segment_id, segment.context_start, segment.context_end
                ));
            }
        }
        Ok(())
    }

    pub fn contains(&self, segment_id: &str) -> bool {
        self.segments.iter().any(|s| s.segment_id == segment_id)
    }
}

impl Pass1Segment {
    fn start_start_end_ok(&self) -> bool {
        self.context_start < self.context_end
    }
}

/// The five sub-scores pass 2 assigns, each on a 1-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubScores {
    pub quote_strength: f64,
    pub factual_accuracy: f64,
    pub potential_impact: f64,
    pub specificity: f64,
    pub context_appropriateness: f64,
}

impl SubScores {
    /// Weighted composite per §4.6: 0.30 quote + 0.25 accuracy + 0.25 impact
    /// + 0.10 specificity + 0.10 context.
    pub fn composite(&self) -> f64 {
        0.30 * self.quote_strength
            + 0.25 * self.factual_accuracy
            + 0.25 * self.potential_impact
            + 0.10 * self.specificity
            + 0.10 * self.context_appropriateness
    }
}

/// A pass-1 segment re-scored and (possibly) retained by pass 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pass2Segment {
    #[serde(flatten)]
    pub base: Pass1Segment,
    pub scores: SubScores,
}

impl Pass2Segment {
    pub fn composite(&self) -> f64 {
        self.scores.composite()
    }

    pub fn segment_id(&self) -> &str {
        &self.base.segment_id
    }

    pub fn harm_category(&self) -> &str {
        &self.base.harm_category
    }
}

/// Filtered, re-ranked candidate set (target 8-12 segments).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pass2Analysis {
    pub segments: Vec<Pass2Segment>,
}

impl Pass2Analysis {
    /// Subset invariant: every kept segment_id must appear in pass 1.
    pub fn validate_subset_of(&self, pass1: &Pass1Analysis) -> Result<(), String> {
        let mut seen = HashSet::new();
        for segment in &self.segments {
            if !seen.insert(segment.segment_id()) {
                return Err(format!("duplicate segment_id {} in pass2", segment.segment_id()));
            }
            if !pass1.contains(segment.segment_id()) {
                return Err(format!(
                    "pass2 segment_id {} does not appear in pass1_analysis",
                    segment.segment_id()
                ));
            }
        }
        Ok(())
    }

    pub fn contains(&self, segment_id: &str) -> bool {
        self.segments.iter().any(|s| s.segment_id() == segment_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote() -> EvidenceQuote {
        EvidenceQuote { timestamp: 1.0, speaker: "A".into(), quote: "said something".into() }
    }

    fn pass1_segment(id: &str) -> Pass1Segment {
        Pass1Segment {
            segment_id: id.into(),
            title: "title".into(),
            severity: Severity::High,
            harm_category: "misinformation".into(),
            evidence: vec![quote()],
            context: "context".into(),
            confidence: 0.9,
            duration_seconds: 12.0,
            context_start: 10.0,
            context_end: 22.0,
        }
    }

    #[test]
    fn composite_matches_weighted_formula() {
        let scores = SubScores {
            quote_strength: 10.0,
            factual_accuracy: 8.0,
            potential_impact: 8.0,
            specificity: 6.0,
            context_appropriateness: 6.0,
        };
        let expected = 0.30 * 10.0 + 0.25 * 8.0 + 0.25 * 8.0 + 0.10 * 6.0 + 0.10 * 6.0;
        assert!((scores.composite() - expected).abs() < 1e-9);
    }

    #[test]
    fn subset_invariant_rejects_fabricated_segment() {
        let pass1 = Pass1Analysis { segments: vec![pass1_segment("seg-1")] };
        let pass2 = Pass2Analysis {
            segments: vec![Pass2Segment {
                base: pass1_segment("seg-2"),
                scores: SubScores {
                    quote_strength: 7.0,
                    factual_accuracy: 7.0,
                    potential_impact: 7.0,
                    specificity: 7.0,
                    context_appropriateness: 7.0,
                },
            }],
        };
        assert!(pass2.validate_subset_of(&pass1).is_err());
    }

    #[test]
    fn subset_invariant_accepts_matching_segment() {
        let pass1 = Pass1Analysis { segments: vec![pass1_segment("seg-1")] };
        let pass2 = Pass2Analysis {
            segments: vec![Pass2Segment {
                base: pass1_segment("seg-1"),
                scores: SubScores {
                    quote_strength: 7.0,
                    factual_accuracy: 7.0,
                    potential_impact: 7.0,
                    specificity: 7.0,
                    context_appropriateness: 7.0,
                },
            }],
        };
        assert!(pass2.validate_subset_of(&pass1).is_ok());
    }
}
