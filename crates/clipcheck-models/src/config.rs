//! Configuration knobs, layered defaults < file < env < CLI flags.
//!
//! Mirrors the teacher's `WorkerConfig` shape (a flat struct with a
//! `Default` impl and per-field overrides) generalized to also accept a
//! TOML document (§6 "configuration document").

use serde::{Deserialize, Serialize};

/// Two-pass controller knobs (§4.6, §6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoPassConfig {
    pub target_count: usize,
    pub min_count: usize,
    pub max_count: usize,
    pub quality_threshold: f64,
    pub fallback_threshold: f64,
    pub auto_include_threshold: f64,
    pub max_category_fraction: f64,
    pub similarity_threshold: f64,
}

impl Default for TwoPassConfig {
    fn default() -> Self {
        Self {
            target_count: 10,
            min_count: 8,
            max_count: 12,
            quality_threshold: 6.5,
            fallback_threshold: 6.0,
            auto_include_threshold: 8.5,
            max_category_fraction: 0.5,
            similarity_threshold: 0.7,
        }
    }
}

/// Retry policy knobs (§4.4, §6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicyConfig {
    pub max_attempts: u32,
    pub base_delay_seconds: f64,
    pub per_call_timeout_seconds: f64,
}

impl Default for RetryPolicyConfig {
    fn default() -> Self {
        Self { max_attempts: 4, base_delay_seconds: 1.0, per_call_timeout_seconds: 120.0 }
    }
}

/// Worker-pool sizes for stages 5 and 6 (§5, §6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub tts_workers: usize,
    pub clip_workers: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { tts_workers: 2, clip_workers: 2 }
    }
}

/// Filesystem locations (§6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub content_root: String,
    pub prompts_dir: String,
    pub analysis_rules_path: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_root: "./content".into(),
            prompts_dir: "./prompts".into(),
            analysis_rules_path: "./prompts/analysis_rules.md".into(),
        }
    }
}

/// The fully-resolved configuration document (§6), before CLI-flag overrides
/// are layered on top by the CLI crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub two_pass: TwoPassConfig,
    pub retry: RetryPolicyConfig,
    pub concurrency: ConcurrencyConfig,
    pub paths: PathsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.two_pass.min_count, 8);
        assert_eq!(config.two_pass.max_count, 12);
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.concurrency.tts_workers, 2);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let partial: PipelineConfig = toml::from_str("[two_pass]\nmin_count = 5\n").unwrap();
        assert_eq!(partial.two_pass.min_count, 5);
        assert_eq!(partial.two_pass.max_count, 12);
        assert_eq!(partial.retry.max_attempts, 4);
    }
}
