//! Post records
//!
//! Posts are owned by the surrounding application. The ranking core only
//! reads them and writes back the vote count it received from the ledger.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;

/// Identifier of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-submitted post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Last count received from the vote ledger
    #[serde(default)]
    pub vote_count: u64,
    /// Set once at submission
    pub created_at: DateTime<Utc>,
    /// Campaigns this post was submitted under
    #[serde(default)]
    pub campaign_ids: Vec<CampaignId>,
}

impl Post {
    /// Creates a post with no votes
    pub fn new(
        id: PostId,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
        campaign_ids: Vec<CampaignId>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            vote_count: 0,
            created_at,
            campaign_ids,
        }
    }

    /// Whether the post was submitted under the campaign
    pub fn belongs_to(&self, campaign_id: CampaignId) -> bool {
        self.campaign_ids.contains(&campaign_id)
    }
}
