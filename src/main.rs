//! Frame Snapshot CLI
//!
//! Replays recorded stack samples through the snapshot cleaner and
//! differencer, for inspecting how a runtime's stacks are reduced.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use frame_snapshot::commands::{
    display_version, execute_replay, validate_args, validate_report_file, ReplayArgs,
};
use frame_snapshot::utils::config::{CleanerOptions, DEFAULT_STACK_CAPACITY};

/// Frame Snapshot - stack cleaning and diffing for sampling profilers
#[derive(Parser, Debug)]
#[command(name = "frame-snapshot")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recording through the cleaner and differencer
    Replay {
        /// Recording JSON (frame table + samples)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only keep frames whose file lives under this path
        #[arg(long, env = "FRAME_SNAPSHOT_APP_ROOT")]
        app_root: Option<String>,

        /// Frame slots per snapshot buffer
        #[arg(long, default_value_t = DEFAULT_STACK_CAPACITY)]
        capacity: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a replay report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Replay {
            input,
            output,
            app_root,
            capacity,
            summary,
        } => {
            let mut cleaner = CleanerOptions::new();
            if let Some(root) = app_root {
                cleaner = cleaner.with_app_root(root);
            }

            let args = ReplayArgs {
                input,
                output_json: output,
                capacity,
                cleaner,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_replay(&args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
