//! Observable lifecycle events
//!
//! Every structured log line carries an `event` field holding one of these
//! names, so log consumers can match on a stable vocabulary instead of on
//! message text.

use std::fmt;

/// Observable events in the ranking core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Fixtures loaded into the store
    FixturesLoaded,

    // Campaign lifecycle
    /// Campaign passed validation and was stored
    CampaignCreated,
    /// Campaign draft rejected by validation
    CampaignRejected,

    // Votes
    /// Vote accepted by the ledger and synced to the store
    VoteRecorded,
    /// Vote rejected by the ledger
    VoteRejected,

    // Rank index
    /// Indexer task started
    IndexerStarted,
    /// Indexer task stopped
    IndexerStopped,
    /// Upsert accepted into the pending pipeline
    UpsertAccepted,
    /// Indexing pipeline suspended
    IndexSuspended,
    /// Indexing pipeline resumed
    IndexResumed,
    /// Refresh published a new snapshot
    RefreshComplete,
    /// Refresh gave up waiting for the pipeline
    RefreshTimeout,
    /// Campaign bulk-imported into the index
    CampaignReindexed,

    // Queries
    /// Ranking query answered
    QueryExecuted,
    /// Ranking query rejected
    QueryRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::FixturesLoaded => "FIXTURES_LOADED",

            Event::CampaignCreated => "CAMPAIGN_CREATED",
            Event::CampaignRejected => "CAMPAIGN_REJECTED",

            Event::VoteRecorded => "VOTE_RECORDED",
            Event::VoteRejected => "VOTE_REJECTED",

            Event::IndexerStarted => "INDEXER_STARTED",
            Event::IndexerStopped => "INDEXER_STOPPED",
            Event::UpsertAccepted => "UPSERT_ACCEPTED",
            Event::IndexSuspended => "INDEX_SUSPENDED",
            Event::IndexResumed => "INDEX_RESUMED",
            Event::RefreshComplete => "REFRESH_COMPLETE",
            Event::RefreshTimeout => "REFRESH_TIMEOUT",
            Event::CampaignReindexed => "CAMPAIGN_REINDEXED",

            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::QueryRejected => "QUERY_REJECTED",
        }
    }

    /// Returns true if this event reports a failed operation
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::CampaignRejected
                | Event::VoteRejected
                | Event::RefreshTimeout
                | Event::QueryRejected
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
