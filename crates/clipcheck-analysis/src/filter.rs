//! The deterministic pass-2 filtering algorithm (§4.6). The LLM supplies
//! sub-scores; everything from drop-threshold through max-count capping is
//! decided here, in order, so it is testable without a live model.

use std::collections::HashMap;

use clipcheck_models::{Pass2Analysis, Pass2Segment, TwoPassConfig};
use tracing::warn;

/// Default similarity metric for dedup (§9 open question): normalized
/// token-set overlap (Jaccard) over `title + context`, lowercased and
/// split on non-alphanumeric boundaries.
pub fn title_context_similarity(a: &Pass2Segment, b: &Pass2Segment) -> f64 {
    let tokens_a = tokenize(&format!("{} {}", a.base.title, a.base.context));
    let tokens_b = tokenize(&format!("{} {}", b.base.title, b.base.context));
    jaccard(&tokens_a, &tokens_b)
}

fn tokenize(text: &str) -> std::collections::HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn jaccard(a: &std::collections::HashSet<String>, b: &std::collections::HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Tie-break per §4.6: higher quote strength wins, then lower
/// `context_start` (earlier segment wins).
fn rank_better(a: &Pass2Segment, b: &Pass2Segment) -> std::cmp::Ordering {
    b.composite()
        .partial_cmp(&a.composite())
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| {
            b.scores
                .quote_strength
                .partial_cmp(&a.scores.quote_strength)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .then_with(|| {
            a.base
                .context_start
                .partial_cmp(&b.base.context_start)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Runs the six ordered filtering rules over the full scored candidate set
/// (every pass-1 segment, each paired with its pass-2 sub-scores) and
/// returns the kept set.
pub fn filter(mut candidates: Vec<Pass2Segment>, config: &TwoPassConfig) -> Pass2Analysis {
    // Rule 1: hard floor on quote strength, factual accuracy, specificity.
    candidates.retain(|c| {
        c.scores.quote_strength >= 6.0 && c.scores.factual_accuracy >= 5.0 && c.scores.specificity >= 5.0
    });

    // Rule 2: auto-retain segments clearing the "genuinely harmful" floor.
    let (mut kept, mut rest): (Vec<_>, Vec<_>) =
        candidates.into_iter().partition(|c| c.composite() >= config.auto_include_threshold);

    // Rule 3: fill up to min_count, lowering the threshold if needed, then
    // falling back to top-N.
    rest.sort_by(rank_better);

    let mut threshold = config.quality_threshold;
    let mut chosen: Vec<Pass2Segment> = rest.iter().filter(|c| c.composite() >= threshold).cloned().collect();

    if kept.len() + chosen.len() < config.min_count {
        threshold = config.fallback_threshold;
        chosen = rest.iter().filter(|c| c.composite() >= threshold).cloned().collect();
    }

    if kept.len() + chosen.len() < config.min_count {
        let need = config.min_count.saturating_sub(kept.len());
        chosen = rest.into_iter().take(need).collect();
    }

    kept.extend(chosen);
    kept.sort_by(rank_better);

    // Rule 4: category balance, unless enforcing it would drop below min_count.
    enforce_category_cap(&mut kept, config);

    // Rule 5: dedup near-identical topics, keeping the better-ranked one.
    dedup_similar(&mut kept, config.similarity_threshold);

    // Rule 6: cap at max_count by dropping the lowest composites.
    kept.sort_by(rank_better);
    kept.truncate(config.max_count);

    Pass2Analysis { segments: kept }
}

fn enforce_category_cap(kept: &mut Vec<Pass2Segment>, config: &TwoPassConfig) {
    // The cap's denominator is frozen to `max_count` (the kept set's
    // eventual ceiling once rule 6 truncates it) rather than recomputed
    // against the shrinking in-progress `kept.len()` on every iteration.
    // Recomputing it against the shrinking size keeps lowering the target
    // as segments are dropped, so the loop overshoots past the intended
    // ratio and grinds the kept set all the way down to `min_count`.
    let cap = (config.max_count as f64 * config.max_category_fraction).floor() as usize;

    loop {
        if kept.len() <= config.min_count {
            return;
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for seg in kept.iter() {
            *counts.entry(seg.harm_category()).or_insert(0) += 1;
        }

        let Some((&dominant, &count)) = counts.iter().max_by_key(|(_, &n)| n) else {
            return;
        };

        if count <= cap.max(1) {
            return;
        }

        if counts.len() == 1 {
            warn!(
                category = dominant,
                "all kept segments share one harm category; suspending category cap to preserve min_count"
            );
            return;
        }

        // Drop the lowest-ranked segment in the dominant category.
        let drop_index = kept
            .iter()
            .enumerate()
            .filter(|(_, seg)| seg.harm_category() == dominant)
            .max_by(|(_, a), (_, b)| rank_better(a, b).reverse())
            .map(|(i, _)| i);

        match drop_index {
            Some(i) => {
                kept.remove(i);
            },
            None => return,
        }
    }
}

fn dedup_similar(kept: &mut Vec<Pass2Segment>, similarity_threshold: f64) {
    let mut survivors: Vec<Pass2Segment> = Vec::with_capacity(kept.len());

    'outer: for candidate in kept.drain(..) {
        for existing in survivors.iter_mut() {
            if title_context_similarity(existing, &candidate) >= similarity_threshold {
                if rank_better(&candidate, existing) == std::cmp::Ordering::Less {
                    *existing = candidate;
                }
                continue 'outer;
            }
        }
        survivors.push(candidate);
    }

    *kept = survivors;
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcheck_models::{Pass1Segment, Severity, SubScores};

    fn segment(id: &str, category: &str, composite_inputs: (f64, f64, f64, f64, f64), start: f64) -> Pass2Segment {
        Pass2Segment {
            base: Pass1Segment {
                segment_id: id.into(),
                title: format!("title {id}"),
                severity: Severity::Medium,
                harm_category: category.into(),
                evidence: vec![],
                context: format!("context {id}"),
                confidence: 0.9,
                duration_seconds: 10.0,
                context_start: start,
                context_end: start + 10.0,
            },
            scores: SubScores {
                quote_strength: composite_inputs.0,
                factual_accuracy: composite_inputs.1,
                potential_impact: composite_inputs.2,
                specificity: composite_inputs.3,
                context_appropriateness: composite_inputs.4,
            },
        }
    }

    #[test]
    fn drops_segments_below_hard_floor() {
        let candidates = vec![segment("s1", "x", (5.0, 9.0, 9.0, 9.0, 9.0), 0.0)];
        let config = TwoPassConfig::default();
        let result = filter(candidates, &config);
        assert!(result.segments.is_empty());
    }

    #[test]
    fn auto_retains_high_composite_segments() {
        let candidates = vec![segment("s1", "x", (10.0, 10.0, 10.0, 10.0, 10.0), 0.0)];
        let config = TwoPassConfig::default();
        let result = filter(candidates, &config);
        assert_eq!(result.segments.len(), 1);
    }

    #[test]
    fn falls_back_to_top_n_when_below_min_count() {
        let mut candidates = Vec::new();
        for i in 0..3 {
            candidates.push(segment(&format!("s{i}"), "x", (6.0, 5.0, 5.0, 5.0, 5.0), i as f64 * 20.0));
        }
        let mut config = TwoPassConfig::default();
        config.min_count = 3;
        let result = filter(candidates, &config);
        assert_eq!(result.segments.len(), 3);
    }

    #[test]
    fn category_cap_enforced_when_above_min_count() {
        let mut candidates = Vec::new();
        for i in 0..12 {
            candidates.push(segment(&format!("x{i}"), "X", (9.0, 9.0, 9.0, 9.0, 9.0), i as f64 * 20.0));
        }
        for i in 0..3 {
            candidates.push(segment(&format!("y{i}"), "Y", (9.0, 9.0, 9.0, 9.0, 9.0), 1000.0 + i as f64 * 20.0));
        }
        let mut config = TwoPassConfig::default();
        config.max_category_fraction = 0.5;
        config.min_count = 8;
        config.max_count = 12;
        let result = filter(candidates, &config);

        let x_count = result.segments.iter().filter(|s| s.harm_category() == "X").count();
        let y_count = result.segments.iter().filter(|s| s.harm_category() == "Y").count();
        assert!(x_count <= 6, "expected at most 6 from X, got {x_count}");
        assert_eq!(y_count, 3);
        assert_eq!(result.segments.len(), 9);
    }

    #[test]
    fn category_cap_suspended_when_single_category_below_min_count() {
        let mut candidates = Vec::new();
        for i in 0..8 {
            candidates.push(segment(&format!("x{i}"), "X", (9.0, 9.0, 9.0, 9.0, 9.0), i as f64 * 20.0));
        }
        let mut config = TwoPassConfig::default();
        config.min_count = 8;
        config.max_category_fraction = 0.5;
        let result = filter(candidates, &config);
        assert_eq!(result.segments.len(), 8);
    }

    #[test]
    fn dedup_keeps_only_the_higher_scoring_representative() {
        let mut high = segment("s1", "x", (9.0, 9.0, 9.0, 9.0, 9.0), 0.0);
        high.base.title = "shared topic".into();
        high.base.context = "shared context words here".into();
        let mut low = segment("s2", "x", (7.0, 7.0, 7.0, 7.0, 7.0), 5.0);
        low.base.title = "shared topic".into();
        low.base.context = "shared context words here".into();

        let mut config = TwoPassConfig::default();
        config.min_count = 1;
        config.similarity_threshold = 0.5;
        let result = filter(vec![high, low], &config);
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].segment_id(), "s1");
    }

    #[test]
    fn tie_break_prefers_higher_quote_strength_then_earlier_start() {
        let a = segment("a", "x", (8.0, 7.0, 7.0, 7.0, 6.0), 100.0);
        let b = segment("b", "x", (9.0, 6.0, 7.0, 7.0, 6.0), 50.0);
        // composite: a = 0.3*8+0.25*7+0.25*7+0.1*7+0.1*6 = 2.4+1.75+1.75+0.7+0.6=7.2
        // composite: b = 0.3*9+0.25*6+0.25*7+0.1*7+0.1*6 = 2.7+1.5+1.75+0.7+0.6=7.25
        assert!(rank_better(&b, &a) == std::cmp::Ordering::Less);
    }

    #[test]
    fn max_count_caps_by_dropping_lowest_composites() {
        let mut candidates = Vec::new();
        for i in 0..14 {
            let strength = 6.0 + (i as f64) * 0.2;
            candidates.push(segment(&format!("s{i}"), "x", (strength, 8.0, 8.0, 8.0, 8.0), i as f64 * 10.0));
        }
        let mut config = TwoPassConfig::default();
        config.min_count = 8;
        config.max_count = 12;
        config.max_category_fraction = 1.0;
        let result = filter(candidates, &config);
        assert_eq!(result.segments.len(), 12);
    }
}
