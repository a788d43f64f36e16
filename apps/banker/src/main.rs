//! banker - deadlock-avoidance safety checks
//!
//! This is the CLI application that loads resource-state snapshots,
//! evaluates them with the safety crate and renders the verdicts.

mod cli;
mod display;
mod error;
mod report;
mod snapshots;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::report::{CheckReport, OperationResult, ReplayReport};
use crate::snapshots::NamedSnapshot;
use banker_config::Config;
use banker_types::OutputFormat;
use clap::Parser;
use std::process;
use tracing::{error, info};

/// Exit status when `--fail-on-unsafe` is set and some snapshot is unsafe
const EXIT_UNSAFE: i32 = 2;

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Application error: {}", e);
            if json_mode {
                let body = serde_json::json!({
                    "error": e.to_string(),
                    "code": e.code(),
                });
                eprintln!("{body}");
            } else {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic, returning the process exit status
async fn run(cli: Cli) -> Result<i32, CliError> {
    info!("Starting banker v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global, &cli.command);

    let renderer = OutputRenderer::new(
        config.general.default_output,
        cli.global.color.unwrap_or(config.general.color),
    );

    let fail_on_unsafe = matches!(
        cli.command,
        Commands::Check {
            fail_on_unsafe: true,
            ..
        }
    );

    let result = execute_command(cli.command, &config).await?;
    renderer.render_result(&result)?;

    if fail_on_unsafe && result.any_unsafe() {
        info!("Unsafe snapshot found, exiting with status {EXIT_UNSAFE}");
        return Ok(EXIT_UNSAFE);
    }

    info!("Command completed successfully");
    Ok(0)
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    config: &Config,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Check { files, trace, .. } => {
            let mut loaded = Vec::with_capacity(files.len());
            for path in &files {
                loaded.push(snapshots::load(path).await?);
            }
            let trace = trace || config.evaluation.trace;
            let reports = check_snapshots(loaded, trace, config.evaluation_jobs()).await?;
            Ok(OperationResult::Check(reports))
        }

        Commands::Replay { file, order } => {
            let NamedSnapshot { name, snapshot } = snapshots::load(&file).await?;
            let final_work = banker_safety::replay(&snapshot, &order)
                .map_err(|e| CliError::Input {
                    path: file.clone(),
                    source: e.into(),
                })?;
            Ok(OperationResult::Replay(ReplayReport {
                name,
                order,
                final_work,
            }))
        }

        Commands::Demo { trace } => {
            let reference = snapshots::reference()?;
            let trace = trace || config.evaluation.trace;
            let reports = check_snapshots(vec![reference], trace, 1).await?;
            Ok(OperationResult::Check(reports))
        }
    }
}

async fn check_snapshots(
    loaded: Vec<NamedSnapshot>,
    trace: bool,
    jobs: usize,
) -> Result<Vec<CheckReport>, CliError> {
    let (names, snapshots): (Vec<_>, Vec<_>) = loaded
        .into_iter()
        .map(|NamedSnapshot { name, snapshot }| (name, snapshot))
        .unzip();
    let shapes: Vec<(usize, usize)> = snapshots
        .iter()
        .map(|s| (s.process_count(), s.resource_type_count()))
        .collect();

    let evaluations: Vec<_> = if trace {
        banker_safety::evaluate_batch_traced(snapshots, jobs)
            .await?
            .into_iter()
            .map(|eval| (eval.result, Some(eval.trace)))
            .collect()
    } else {
        banker_safety::evaluate_batch(snapshots, jobs)
            .await?
            .into_iter()
            .map(|result| (result, None))
            .collect()
    };

    Ok(names
        .into_iter()
        .zip(shapes)
        .zip(evaluations)
        .map(|((name, (processes, resources)), (result, trace))| {
            info!(snapshot = %name, verdict = %result, "snapshot evaluated");
            CheckReport {
                name,
                processes,
                resources,
                result,
                trace,
            }
        })
        .collect())
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &GlobalArgs, command: &Commands) {
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if let Commands::Check {
        jobs: Some(jobs), ..
    } = command
    {
        config.evaluation.jobs = *jobs;
    }
}

/// Initialize tracing/logging
///
/// Logs go to stderr so they never mix with rendered output. JSON mode
/// switches to JSON-formatted log lines, and stays silent unless debug
/// logging was requested.
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    let default_filter = if debug_enabled {
        "info,banker=debug,banker_safety=debug,banker_config=debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    if json_mode {
        if debug_enabled {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        } else {
            // Disable all logging in JSON mode
            tracing_subscriber::fmt()
                .with_writer(std::io::sink)
                .with_env_filter("off")
                .init();
        }
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(debug_enabled)
            .with_env_filter(filter)
            .init();
    }
}
