//! Command line interface definition

use banker_types::ColorChoice;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// banker - deadlock-avoidance safety checks
#[derive(Parser)]
#[command(name = "banker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deadlock-avoidance safety checks for resource allocation snapshots")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check whether snapshot files describe safe states
    Check {
        /// Snapshot documents (.toml, otherwise JSON)
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Show every step of the safety search
        #[arg(long)]
        trace: bool,

        /// Exit with status 2 if any snapshot is unsafe
        #[arg(long)]
        fail_on_unsafe: bool,

        /// Number of snapshots evaluated concurrently (0=auto)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Verify that a completion order is valid for a snapshot
    Replay {
        /// Snapshot document (.toml, otherwise JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Process indices in completion order, comma separated
        #[arg(long, value_delimiter = ',', required = true, num_args = 1..)]
        order: Vec<usize>,
    },

    /// Evaluate the built-in five-process reference scenario
    Demo {
        /// Show every step of the safety search
        #[arg(long)]
        trace: bool,
    },
}
