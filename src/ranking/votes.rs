//! Vote recording
//!
//! Carries a vote through the pipeline: ledger, then store, then one index
//! upsert per campaign the post belongs to. The upserts are only accepted
//! here; visibility still waits for the caller's refresh.

use std::sync::Arc;

use super::errors::{RankingError, RankingResult};
use crate::index::{RankEntry, RankIndex};
use crate::ledger::{VoteLedger, VoterId};
use crate::observability::Event;
use crate::post::{Post, PostId};
use crate::store::CampaignRepository;

/// Records votes and keeps store and index in step with the ledger.
pub struct VoteRecorder<R: CampaignRepository, L: VoteLedger> {
    repository: Arc<R>,
    ledger: Arc<L>,
    index: Arc<RankIndex>,
}

impl<R: CampaignRepository, L: VoteLedger> VoteRecorder<R, L> {
    pub fn new(repository: Arc<R>, ledger: Arc<L>, index: Arc<RankIndex>) -> Self {
        Self {
            repository,
            ledger,
            index,
        }
    }

    /// Casts a vote and re-indexes the post. Returns the post's new count.
    ///
    /// # Errors
    ///
    /// - `PostNotFound` for a post the repository does not know; the
    ///   ledger is not touched
    /// - `Ledger(AlreadyVoted)` for a repeated vote; nothing is re-indexed
    pub fn cast_vote(&self, voter_id: VoterId, post_id: PostId) -> RankingResult<u64> {
        if self.repository.post(post_id)?.is_none() {
            return Err(RankingError::PostNotFound(post_id));
        }

        let count = match self.ledger.cast_vote(voter_id, post_id) {
            Ok(count) => count,
            Err(err) => {
                tracing::info!(
                    event = %Event::VoteRejected,
                    voter_id = %voter_id,
                    post_id = %post_id,
                    code = err.code(),
                    "vote rejected"
                );
                return Err(err.into());
            }
        };

        self.sync_post(post_id)?;
        self.index.metrics().increment_votes_recorded();
        tracing::debug!(
            event = %Event::VoteRecorded,
            voter_id = %voter_id,
            post_id = %post_id,
            vote_count = count,
            "vote recorded"
        );
        Ok(count)
    }

    /// Copies the ledger's current count into the store and upserts the
    /// post into every campaign it belongs to.
    ///
    /// Runs under the index's source guard, shared with campaign reindexing,
    /// so the last import for a post always carries the ledger's latest count.
    pub fn sync_post(&self, post_id: PostId) -> RankingResult<Post> {
        let _guard = self.index.source_guard()?;

        let count = self.ledger.vote_count(post_id)?;
        let post = self.repository.update_vote_count(post_id, count)?;
        self.index.import(
            post.campaign_ids
                .iter()
                .map(|campaign_id| RankEntry::new(*campaign_id, post.id, post.vote_count, post.created_at)),
        )?;
        Ok(post)
    }
}
