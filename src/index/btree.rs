//! Ordered per-campaign rank structures
//!
//! A `RankTree` keeps every entry of one campaign in a `BTreeSet<RankKey>`,
//! so iteration order *is* ranking order and never depends on insertion
//! history or hashing.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::campaign::CampaignId;
use crate::post::PostId;

/// The indexed projection of a post within one campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    pub campaign_id: CampaignId,
    pub post_id: PostId,
    pub vote_count: u64,
    pub created_at: DateTime<Utc>,
}

impl RankEntry {
    pub fn new(
        campaign_id: CampaignId,
        post_id: PostId,
        vote_count: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            campaign_id,
            post_id,
            vote_count,
            created_at,
        }
    }

    /// The sort key of this entry
    pub fn key(&self) -> RankKey {
        RankKey {
            vote_count: self.vote_count,
            created_at: self.created_at,
            post_id: self.post_id,
        }
    }
}

/// Composite ranking key.
///
/// Ordering:
/// 1. `vote_count` descending
/// 2. `created_at` ascending (earlier post wins a tie)
/// 3. `post_id` ascending (posts created in the same instant)
///
/// The last component makes the order total, so two distinct posts never
/// compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankKey {
    pub vote_count: u64,
    pub created_at: DateTime<Utc>,
    pub post_id: PostId,
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .vote_count
            .cmp(&self.vote_count)
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.post_id.cmp(&other.post_id))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// All ranked entries of a single campaign.
#[derive(Debug, Clone, Default)]
pub struct RankTree {
    /// Current entry per post
    entries: HashMap<PostId, RankEntry>,
    /// Keys of `entries`, in ranking order
    order: BTreeSet<RankKey>,
}

impl RankTree {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `entry.post_id`.
    ///
    /// Returns the replaced entry, if any.
    pub fn upsert(&mut self, entry: RankEntry) -> Option<RankEntry> {
        let previous = self.entries.insert(entry.post_id, entry);
        if let Some(old) = &previous {
            self.order.remove(&old.key());
        }
        self.order.insert(entry.key());
        previous
    }

    /// Looks up the entry of a post
    pub fn get(&self, post_id: PostId) -> Option<&RankEntry> {
        self.entries.get(&post_id)
    }

    /// Entries with `vote_count >= min_votes`, in ranking order.
    ///
    /// Because keys are sorted by descending vote count, iteration stops at
    /// the first key below the threshold.
    pub fn ranked(&self, min_votes: u64) -> impl Iterator<Item = &RankEntry> + '_ {
        self.order
            .iter()
            .take_while(move |key| key.vote_count >= min_votes)
            .filter_map(move |key| self.entries.get(&key.post_id))
    }

    /// Number of indexed posts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
