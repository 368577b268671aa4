//! Config layering (§6, §9.4): defaults < `--config` TOML file < environment
//! < CLI flags. Mirrors `WorkerConfig::from_env`'s `env::var(...).ok().and_then(...)`
//! idiom, generalized to also read a TOML document first.

use std::path::Path;

use clipcheck_models::PipelineConfig;

use crate::cli::Cli;

/// The result of loading the config file layer: the resolved config plus
/// whether the file was actually found (a missing `--config` file is not
/// fatal — it falls back to defaults with a warning, same as a teacher
/// config crate would log a missing optional file).
pub struct Loaded {
    pub config: PipelineConfig,
    pub file_missing: bool,
}

pub fn load(path: &str) -> Result<Loaded, String> {
    let (mut config, file_missing) = if Path::new(path).exists() {
        let text = std::fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}"))?;
        let config: PipelineConfig = toml::from_str(&text).map_err(|e| format!("parsing {path}: {e}"))?;
        (config, false)
    } else {
        (PipelineConfig::default(), true)
    };

    apply_env_overrides(&mut config);
    Ok(Loaded { config, file_missing })
}

fn apply_env_overrides(config: &mut PipelineConfig) {
    if let Some(v) = env_usize("CLIPCHECK_TWO_PASS_MIN_COUNT") {
        config.two_pass.min_count = v;
    }
    if let Some(v) = env_usize("CLIPCHECK_TWO_PASS_MAX_COUNT") {
        config.two_pass.max_count = v;
    }
    if let Some(v) = env_u32("CLIPCHECK_RETRY_MAX_ATTEMPTS") {
        config.retry.max_attempts = v;
    }
    if let Some(v) = env_f64("CLIPCHECK_RETRY_BASE_DELAY_SECONDS") {
        config.retry.base_delay_seconds = v;
    }
    if let Some(v) = env_usize("CLIPCHECK_TTS_WORKERS") {
        config.concurrency.tts_workers = v;
    }
    if let Some(v) = env_usize("CLIPCHECK_CLIP_WORKERS") {
        config.concurrency.clip_workers = v;
    }
    if let Ok(v) = std::env::var("CLIPCHECK_CONTENT_ROOT") {
        config.paths.content_root = v;
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_u32(key: &str) -> Option<u32> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Layers the CLI flags on top of an already-loaded config — the final,
/// highest-precedence layer.
pub fn apply_cli_overrides(config: &mut PipelineConfig, cli: &Cli) {
    if let Some(content_root) = &cli.content_root {
        config.paths.content_root = content_root.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency.tts_workers = concurrency;
        config.concurrency.clip_workers = concurrency;
    }
    if let Some(max_retries) = cli.max_retries {
        config.retry.max_attempts = max_retries;
    }
    if let Some(base_delay) = cli.retry_base_delay {
        config.retry.base_delay_seconds = base_delay;
    }
}
