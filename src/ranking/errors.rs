//! # Ranking Errors
//!
//! The ranking layer adds no recovery of its own: index, store and ledger
//! failures are wrapped and propagated unchanged.

use thiserror::Error;

use crate::campaign::CampaignId;
use crate::index::IndexError;
use crate::ledger::LedgerError;
use crate::post::PostId;
use crate::store::StoreError;

/// Result type for ranking operations
pub type RankingResult<T> = Result<T, RankingError>;

/// Ranking errors
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("unknown campaign: {0}")]
    UnknownCampaign(CampaignId),

    /// The index or a vote names a post the store does not have
    #[error("post not found: {0}")]
    PostNotFound(PostId),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl RankingError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RankingError::UnknownCampaign(_) => "RANKING_UNKNOWN_CAMPAIGN",
            RankingError::PostNotFound(_) => "RANKING_POST_NOT_FOUND",
            RankingError::Index(err) => err.code(),
            RankingError::Store(err) => err.code(),
            RankingError::Ledger(err) => err.code(),
        }
    }

    /// Whether the caller may retry the same operation
    pub fn is_retryable(&self) -> bool {
        match self {
            RankingError::Index(err) => err.is_retryable(),
            RankingError::Ledger(err) => err.is_retryable(),
            _ => false,
        }
    }
}
