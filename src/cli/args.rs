//! CLI argument definitions using clap
//!
//! Commands:
//! - campaignrank top --config <path> --campaign <id> [--min-votes <n>] [--limit <n>]
//! - campaignrank validate --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// campaignrank - vote-ranked posts per marketing campaign
#[derive(Parser, Debug)]
#[command(name = "campaignrank")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the top posts of a campaign
    Top {
        /// Path to configuration file
        #[arg(long, default_value = "./campaignrank.json")]
        config: PathBuf,

        /// Campaign to rank
        #[arg(long)]
        campaign: u64,

        /// Only posts with at least this many votes
        #[arg(long, default_value_t = 0)]
        min_votes: u64,

        /// Maximum number of posts to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Validate a campaign draft read from stdin
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./campaignrank.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
