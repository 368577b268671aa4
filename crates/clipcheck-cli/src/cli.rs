//! Command surface (§6): one top-level command, no subcommands.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Narrated fact-checking compilation pipeline", long_about = None)]
pub struct Cli {
    /// Remote source reference or local audio path.
    pub source: String,

    /// Comma-separated subset of stages `1..7`, e.g. `3,4,5`. Must form a
    /// contiguous run; mutually exclusive with `--from`/`--to`.
    #[arg(long, value_name = "LIST")]
    pub stages: Option<String>,

    /// Inclusive lower stage bound (1-7).
    #[arg(long, value_name = "N", conflicts_with = "stages")]
    pub from: Option<u8>,

    /// Inclusive upper stage bound (1-7).
    #[arg(long, value_name = "N", conflicts_with = "stages")]
    pub to: Option<u8>,

    /// Episode workspace root. Defaults from config.
    #[arg(long, value_name = "PATH")]
    pub content_root: Option<String>,

    /// Configuration file override.
    #[arg(long, value_name = "PATH", default_value = "clipcheck.toml")]
    pub config: String,

    /// Worker count for stages 5 (TTS) and 6 (clipping).
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Maximum retry attempts per adapter call.
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Base delay, in seconds, before the first retry backoff.
    #[arg(long, value_name = "SECONDS")]
    pub retry_base_delay: Option<f64>,

    /// Invalidate caches for selected stages before running them.
    #[arg(long)]
    pub force: bool,

    /// Resolve the stage plan and configuration, print it, and exit without
    /// running anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// A contiguous inclusive stage range, 1-indexed, resolved from whichever
/// of `--stages`/`--from`/`--to` the caller used (§9 Open Question: both
/// surfaces collapse to the same `start_from..=stop_after` range; a
/// non-contiguous `--stages` list is rejected rather than silently
/// collapsed to its span).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRange {
    pub from: u8,
    pub to: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum StageRangeError {
    #[error("stage numbers must be between 1 and 7, got {0}")]
    OutOfBounds(u8),
    #[error("--stages list is empty")]
    Empty,
    #[error("--stages must be a contiguous range; got {0}")]
    NonContiguous(String),
    #[error("--from ({from}) must be <= --to ({to})")]
    Inverted { from: u8, to: u8 },
}

impl Cli {
    /// Resolves the stage selection from `--stages` or `--from`/`--to`,
    /// defaulting to the full 1-7 range if neither was given.
    pub fn stage_range(&self) -> Result<StageRange, StageRangeError> {
        if let Some(list) = &self.stages {
            return parse_stage_list(list);
        }

        let from = self.from.unwrap_or(1);
        let to = self.to.unwrap_or(7);
        if from == 0 || from > 7 {
            return Err(StageRangeError::OutOfBounds(from));
        }
        if to == 0 || to > 7 {
            return Err(StageRangeError::OutOfBounds(to));
        }
        if from > to {
            return Err(StageRangeError::Inverted { from, to });
        }
        Ok(StageRange { from, to })
    }
}

fn parse_stage_list(list: &str) -> Result<StageRange, StageRangeError> {
    let mut stages: Vec<u8> = Vec::new();
    for part in list.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let n: u8 = part.parse().map_err(|_| StageRangeError::OutOfBounds(0))?;
        if n == 0 || n > 7 {
            return Err(StageRangeError::OutOfBounds(n));
        }
        stages.push(n);
    }
    if stages.is_empty() {
        return Err(StageRangeError::Empty);
    }
    stages.sort_unstable();
    stages.dedup();

    let from = stages[0];
    let to = stages[stages.len() - 1];
    if (to - from + 1) as usize != stages.len() {
        return Err(StageRangeError::NonContiguous(list.to_string()));
    }
    Ok(StageRange { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(source: &str) -> Cli {
        Cli {
            source: source.to_string(),
            stages: None,
            from: None,
            to: None,
            content_root: None,
            config: "clipcheck.toml".into(),
            concurrency: None,
            max_retries: None,
            retry_base_delay: None,
            force: false,
            dry_run: false,
        }
    }

    #[test]
    fn default_range_covers_all_seven_stages() {
        let c = cli("source");
        assert_eq!(c.stage_range().unwrap(), StageRange { from: 1, to: 7 });
    }

    #[test]
    fn from_to_resolves_directly() {
        let mut c = cli("source");
        c.from = Some(3);
        c.to = Some(5);
        assert_eq!(c.stage_range().unwrap(), StageRange { from: 3, to: 5 });
    }

    #[test]
    fn inverted_from_to_is_rejected() {
        let mut c = cli("source");
        c.from = Some(5);
        c.to = Some(3);
        assert!(c.stage_range().is_err());
    }

    #[test]
    fn contiguous_stages_list_resolves_to_its_span() {
        let mut c = cli("source");
        c.stages = Some("3,4,5".into());
        assert_eq!(c.stage_range().unwrap(), StageRange { from: 3, to: 5 });
    }

    #[test]
    fn non_contiguous_stages_list_is_rejected() {
        let mut c = cli("source");
        c.stages = Some("1,3,5".into());
        assert!(matches!(c.stage_range(), Err(StageRangeError::NonContiguous(_))));
    }

    #[test]
    fn out_of_bounds_stage_is_rejected() {
        let mut c = cli("source");
        c.stages = Some("0,1".into());
        assert!(c.stage_range().is_err());
    }
}
