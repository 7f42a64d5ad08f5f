//! tandem: keep many applications' configuration in sync with a remote.
//!
//! # Usage
//!
//! ```text
//! tandem init [<path>] [--remote <dir>]
//! tandem plan [--app <name> | --all] [--json]
//! tandem diff --app <name> [--domain <domain>]... [--remote <dir>] [--json]
//! tandem capture (--app <name> | --all) [--remote <dir>] [--dry-run] [--json]
//! ```
//!
//! Global flags: `--config <file>` selects the project file (default: the
//! nearest `tandem.yaml` upwards from the current directory), `-v`/`-vv`
//! raise the log level.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{capture::CaptureArgs, diff::DiffArgs, init::InitArgs, plan::PlanArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tandem",
    version,
    about = "Capture and diff application configuration across dependent apps",
    long_about = None,
)]
struct Cli {
    /// Path to the project file (default: nearest tandem.yaml).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a starter tandem.yaml.
    Init(InitArgs),

    /// Show the dependency-ordered execution plan.
    Plan(PlanArgs),

    /// Compare local configuration files against a remote snapshot.
    Diff(DiffArgs),

    /// Capture remote configuration into local files, in dependency order.
    Capture(CaptureArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Plan(args) => args.run(config),
        Commands::Diff(args) => args.run(config),
        Commands::Capture(args) => args.run(config),
    }
}
