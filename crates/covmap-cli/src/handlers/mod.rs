//! Command handlers - kept out of main.rs for testability
//!
//! Each handler module contains the execution logic for one command and
//! the pure helpers it is built from.

pub mod build;
pub mod topics;

pub use build::{build_coverage, execute_build, BuildOutcome};
pub use topics::execute_topics;

use crate::commands::Commands;
use crate::config::CliConfig;
use crate::error::CliResult;

/// Dispatch a parsed subcommand
pub fn run(config: &CliConfig, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Build(args) => execute_build(config, args),
        Commands::Topics(args) => execute_topics(config, args),
    }
}
