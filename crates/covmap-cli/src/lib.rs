//! covmap CLI Library
//!
//! Command-line front end for building coverage maps from coverage event
//! logs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
mod logging;
mod output;

pub use commands::{BuildArgs, Cli, ColorArg, Commands, TopicsArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::init_logging;
pub use output::{render_summary, render_topics};
