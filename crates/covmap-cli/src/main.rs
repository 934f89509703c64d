//! covmap CLI: build coverage maps from coverage event logs
//!
//! ## Usage
//!
//! ```bash
//! covmap build -i instrumentation.json -e events.jsonl -o coverage.json
//! covmap topics Wallet --raw >> scTopics
//! ```

use clap::Parser;
use covmap_cli::{handlers, init_logging, Cli, CliConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    init_logging(&config);

    match handlers::run(&config, &cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
