//! `clipcheck` binary (§6, §9.5): wires config, adapters, and the
//! orchestrator together the way `vclip-worker::main` wires config + deps +
//! run loop, using `clap` the way the pack's other CLI binaries do.

mod adapters;
mod cli;
mod config;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clipcheck_models::StageName;
use clipcheck_pipeline::{CancelToken, PipelineError, RunOptions};
use clipcheck_retry::RetryConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID_ARGS: i32 = 2;
const EXIT_WORKSPACE_BUSY: i32 = 3;
const EXIT_STAGE_FAILURE: i32 = 4;
const EXIT_CANCELLED: i32 = 5;

#[tokio::main]
async fn main() {
    rustls::crypto::ring::default_provider().install_default().expect("failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(EnvFilter::from_default_env().add_directive("clipcheck=info".parse().unwrap()))
        .init();

    let cli = cli::Cli::parse();

    let stage_range = match cli.stage_range() {
        Ok(range) => range,
        Err(e) => {
            eprintln!("invalid arguments: {e}");
            std::process::exit(EXIT_INVALID_ARGS);
        },
    };

    let loaded = match config::load(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(EXIT_INVALID_ARGS);
        },
    };
    if loaded.file_missing {
        warn!(path = %cli.config, "config file not found, using defaults");
    }

    let mut pipeline_config = loaded.config;
    config::apply_cli_overrides(&mut pipeline_config, &cli);

    let start_from = StageName::from_ordinal(stage_range.from).expect("validated 1-7 range");
    let stop_after = StageName::from_ordinal(stage_range.to).expect("validated 1-7 range");

    let retry = RetryConfig::default()
        .with_max_attempts(pipeline_config.retry.max_attempts)
        .with_base_delay(Duration::from_secs_f64(pipeline_config.retry.base_delay_seconds));

    let (cancel_token, cancel_signal) = CancelToken::new();
    let options = RunOptions::new(cancel_signal)
        .with_range(start_from, stop_after)
        .with_force(cli.force)
        .with_retry(retry);

    if cli.dry_run {
        print_dry_run_plan(&cli, &pipeline_config, start_from, stop_after);
        std::process::exit(EXIT_SUCCESS);
    }

    let shutdown_handle = tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("received interrupt signal, cancelling run");
        cancel_token.cancel();
    });

    let adapter_set = adapters::build();

    info!(source = %cli.source, from = stage_range.from, to = stage_range.to, "starting pipeline run");
    let result = clipcheck_pipeline::run(&cli.source, &options, &adapter_set, &pipeline_config).await;

    shutdown_handle.abort();

    match result {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report).expect("RunReport serializes"));
            if report.succeeded() {
                info!("pipeline run complete");
                std::process::exit(EXIT_SUCCESS);
            } else {
                error!("pipeline run finished with a failed stage");
                std::process::exit(EXIT_STAGE_FAILURE);
            }
        },
        Err(e) => {
            error!(error = %e, "pipeline run failed");
            std::process::exit(exit_code_for(&e));
        },
    }
}

fn exit_code_for(error: &PipelineError) -> i32 {
    match error {
        PipelineError::InvalidSource(_) => EXIT_INVALID_ARGS,
        PipelineError::Workspace(clipcheck_workspace::WorkspaceError::Busy(_)) => EXIT_WORKSPACE_BUSY,
        PipelineError::Workspace(_) => EXIT_STAGE_FAILURE,
        PipelineError::Cancelled { .. } => EXIT_CANCELLED,
        PipelineError::Stage { .. } => EXIT_STAGE_FAILURE,
    }
}

fn print_dry_run_plan(
    cli: &cli::Cli,
    pipeline_config: &clipcheck_models::PipelineConfig,
    start_from: StageName,
    stop_after: StageName,
) {
    let plan = serde_json::json!({
        "source": cli.source,
        "content_root": PathBuf::from(&pipeline_config.paths.content_root),
        "stages": StageName::ORDERED.iter().map(|s| serde_json::json!({
            "stage": s.as_str(),
            "ordinal": s.ordinal(),
            "selected": s.ordinal() >= start_from.ordinal() && s.ordinal() <= stop_after.ordinal(),
        })).collect::<Vec<_>>(),
        "force": cli.force,
        "config": pipeline_config,
    });
    println!("{}", serde_json::to_string_pretty(&plan).expect("dry-run plan serializes"));
}
