//! Campaign and post store
//!
//! Stands in for the application's persistence layer. The ranking core only
//! depends on the `CampaignRepository` trait; `MemoryStore` is the in-process
//! implementation used by the CLI and tests.

mod errors;
mod fixtures;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use fixtures::{CampaignFixture, Fixtures, VoteFixture};
pub use memory::{Company, MemoryStore};

use crate::campaign::{Campaign, CampaignId};
use crate::post::{Post, PostId};

/// Read access to campaigns and posts, plus vote count write-back.
pub trait CampaignRepository: Send + Sync {
    /// Looks up a campaign
    fn campaign(&self, id: CampaignId) -> StoreResult<Option<Campaign>>;

    /// Every post submitted under the campaign, by ascending post id.
    fn campaign_posts(&self, id: CampaignId) -> StoreResult<Vec<Post>>;

    /// Looks up a post
    fn post(&self, id: PostId) -> StoreResult<Option<Post>>;

    /// Stores the vote count received from the ledger and returns the
    /// updated post.
    fn update_vote_count(&self, id: PostId, vote_count: u64) -> StoreResult<Post>;
}
