//! CLI command implementations
//!
//! Both commands boot from the same configuration: fixtures are loaded into
//! an in-memory store, then `top` additionally replays the fixture votes
//! through the ledger and refreshes the rank index before querying.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::campaign::{CampaignDraft, CampaignId};
use crate::index::{IndexConfig, RankIndex};
use crate::ledger::InMemoryVoteLedger;
use crate::observability::{init_logging, Event, MetricsRegistry};
use crate::ranking::{CampaignRankingService, VoteRecorder};
use crate::store::{Fixtures, MemoryStore, StoreError};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fixture file (required). Relative paths resolve against the config
    /// file's directory.
    pub fixtures_path: PathBuf,

    /// Refresh bound in milliseconds (optional, default 5000)
    #[serde(default = "default_refresh_timeout_ms")]
    pub refresh_timeout_ms: u64,

    /// Default `tracing` filter when `RUST_LOG` is unset (optional, default "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_refresh_timeout_ms() -> u64 {
    5000
}
fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.fixtures_path.as_os_str().is_empty() {
            return Err(CliError::config_error("fixtures_path must not be empty"));
        }

        if self.refresh_timeout_ms == 0 {
            return Err(CliError::config_error("refresh_timeout_ms must be > 0"));
        }

        Ok(())
    }

    /// Fixture file location
    pub fn fixtures_file(&self) -> PathBuf {
        if self.fixtures_path.is_absolute() {
            self.fixtures_path.clone()
        } else {
            self.base_dir.join(&self.fixtures_path)
        }
    }

    /// Index settings derived from this config
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::with_refresh_timeout(Duration::from_millis(self.refresh_timeout_ms))
    }
}

/// Everything `top` needs after boot
pub struct BootedSystem {
    pub store: Arc<MemoryStore>,
    pub index: Arc<RankIndex>,
    pub service: CampaignRankingService<MemoryStore>,
}

/// Boot sequence:
/// 1. Fixture load (companies, campaigns, posts)
/// 2. Index start and campaign reindex
/// 3. Vote replay through the ledger
/// 4. Refresh
///
/// Must run inside a tokio runtime.
pub async fn boot_system(config: &Config) -> CliResult<BootedSystem> {
    let fixtures = Fixtures::load(&config.fixtures_file())?;

    let metrics = Arc::new(MetricsRegistry::new());
    let store = Arc::new(MemoryStore::with_metrics(Arc::clone(&metrics)));
    fixtures.install(&store)?;

    let index = Arc::new(RankIndex::start_with_metrics(
        config.index_config(),
        metrics,
    )?);
    let service = CampaignRankingService::new(Arc::clone(&store), Arc::clone(&index));
    for campaign in &fixtures.campaigns {
        service.reindex_campaign(campaign.id)?;
    }

    let ledger = Arc::new(InMemoryVoteLedger::new());
    let recorder = VoteRecorder::new(Arc::clone(&store), ledger, Arc::clone(&index));
    for vote in &fixtures.votes {
        recorder.cast_vote(vote.voter_id, vote.post_id)?;
    }

    index.refresh().await?;

    Ok(BootedSystem {
        store,
        index,
        service,
    })
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command. Failures are
/// reported as a JSON error response before being returned.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command).map_err(|err| {
        let _ = write_error(err.code(), &err.to_string());
        err
    })
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Top {
            config,
            campaign,
            min_votes,
            limit,
        } => top(&config, CampaignId(campaign), min_votes, limit),
        Command::Validate { config } => validate(&config),
    }
}

/// Print the ranked posts of one campaign
pub fn top(
    config_path: &Path,
    campaign_id: CampaignId,
    min_votes: u64,
    limit: Option<usize>,
) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_filter);
    tracing::info!(
        event = %Event::ConfigLoaded,
        fixtures = %config.fixtures_file().display(),
        refresh_timeout_ms = config.refresh_timeout_ms,
        "config loaded"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let posts = runtime.block_on(async {
        let system = boot_system(&config).await?;
        let posts = system
            .service
            .top_posts_limited(campaign_id, min_votes, limit)?;
        Ok::<_, CliError>(posts)
    })?;

    write_response(json!({
        "campaign_id": campaign_id,
        "min_votes": min_votes,
        "posts": posts,
    }))
}

/// Validate a campaign draft from stdin against the configured companies
///
/// Rejection is a normal outcome and answered with an ok response listing
/// the failure codes.
pub fn validate(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_filter);

    let store = MemoryStore::new();
    Fixtures::load(&config.fixtures_file())?.install(&store)?;

    let draft: CampaignDraft = serde_json::from_value(read_request()?)?;
    match store.create_campaign(draft, Utc::now()) {
        Ok(campaign) => write_response(json!({
            "valid": true,
            "campaign": campaign,
        })),
        Err(StoreError::Validation(err)) => write_response(json!({
            "valid": false,
            "reasons": err.codes(),
        })),
        Err(err) => Err(err.into()),
    }
}
