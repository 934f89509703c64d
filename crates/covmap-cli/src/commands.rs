//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// covmap: build coverage maps from instrumented contract coverage events
#[derive(Parser, Debug)]
#[command(name = "covmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a coverage map from instrumentation metadata and an event log
    Build(BuildArgs),

    /// Print the event topics derived for a contract name
    Topics(TopicsArgs),
}

/// Arguments for the build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// JSON object mapping canonical contract path to instrumentation metadata
    #[arg(short, long)]
    pub instrumentation: PathBuf,

    /// Event log (JSON array or one JSON record per line)
    #[arg(short, long)]
    pub events: PathBuf,

    /// Topic side-channel file, appended to on every registration
    #[arg(short, long, env = "COVMAP_TOPICS", default_value = covmap::DEFAULT_TOPICS_PATH)]
    pub topics: PathBuf,

    /// Write the coverage JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of contracts to register
    #[arg(long)]
    pub max_contracts: Option<usize>,
}

/// Arguments for the topics command
#[derive(Parser, Debug)]
pub struct TopicsArgs {
    /// Contract name
    pub contract_name: String,

    /// Print a JSON object keyed by event kind
    #[arg(long)]
    pub json: bool,

    /// Print exactly what registration appends to the side-channel
    #[arg(long, conflicts_with = "json")]
    pub raw: bool,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Auto-detect
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}
