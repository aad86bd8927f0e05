//! campaignrank CLI entry point
//!
//! Runs the parsed command through `cli::run`. On failure the error is
//! printed to stderr and the process exits with status 1.

use campaignrank::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
