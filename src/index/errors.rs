//! Rank index error types
//!
//! Error codes:
//! - INDEX_REFRESH_TIMEOUT (retryable)
//! - INDEX_PIPELINE_CLOSED
//! - INDEX_LOCK_POISONED
//! - INDEX_NO_RUNTIME

use thiserror::Error;

/// Result type for rank index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Rank index errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The pipeline did not confirm visibility in time. Index state is intact
    /// and the refresh may be retried.
    #[error("refresh timed out after {waited_ms}ms with {pending} write(s) still pending")]
    RefreshTimeout { waited_ms: u64, pending: u64 },

    /// The indexer task is gone; accepted writes can no longer be applied.
    #[error("indexing pipeline closed")]
    PipelineClosed,

    /// A thread panicked while holding index state.
    #[error("index lock poisoned: {0}")]
    LockPoisoned(&'static str),

    /// `RankIndex::start` was called outside a tokio runtime.
    #[error("rank index must be started inside a tokio runtime")]
    NoRuntime,
}

impl IndexError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            IndexError::RefreshTimeout { .. } => "INDEX_REFRESH_TIMEOUT",
            IndexError::PipelineClosed => "INDEX_PIPELINE_CLOSED",
            IndexError::LockPoisoned(_) => "INDEX_LOCK_POISONED",
            IndexError::NoRuntime => "INDEX_NO_RUNTIME",
        }
    }

    /// Whether the caller may retry the same operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, IndexError::RefreshTimeout { .. })
    }
}
