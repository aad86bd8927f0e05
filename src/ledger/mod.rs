//! Vote ledger
//!
//! The ledger is the system of record for votes and voter dedup. The ranking
//! core consumes it through `VoteLedger` and only reacts to the returned
//! counts.

mod errors;
mod memory;

pub use errors::{LedgerError, LedgerResult};
pub use memory::InMemoryVoteLedger;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::post::PostId;

/// Identifier of a voting user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(pub u64);

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// System of record for per-post votes.
pub trait VoteLedger: Send + Sync {
    /// Records a vote and returns the post's new vote count.
    ///
    /// # Errors
    ///
    /// `AlreadyVoted` when this voter already voted for the post.
    fn cast_vote(&self, voter_id: VoterId, post_id: PostId) -> LedgerResult<u64>;

    /// Current vote count of a post (zero when it has none).
    fn vote_count(&self, post_id: PostId) -> LedgerResult<u64>;
}
