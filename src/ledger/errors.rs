//! # Vote Ledger Errors

use thiserror::Error;

use super::VoterId;
use crate::post::PostId;

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Vote ledger errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The voter already voted for this post
    #[error("voter {voter_id} already voted for post {post_id}")]
    AlreadyVoted { voter_id: VoterId, post_id: PostId },

    /// The ledger could not be reached or read
    #[error("vote ledger unavailable: {0}")]
    Unavailable(String),
}

impl LedgerError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::AlreadyVoted { .. } => "LEDGER_ALREADY_VOTED",
            LedgerError::Unavailable(_) => "LEDGER_UNAVAILABLE",
        }
    }

    /// Whether the caller may retry the same vote
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Unavailable(_))
    }
}
