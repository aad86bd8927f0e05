//! CLI module for campaignrank
//!
//! Provides command-line interface for:
//! - top: load fixtures, replay votes and print a campaign's ranking
//! - validate: check a campaign draft read from stdin

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot_system, run, run_command, top, validate, BootedSystem, Config};
pub use errors::{CliError, CliResult};
pub use io::{read_request, write_error, write_response};
