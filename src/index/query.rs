//! Ranking query description

use crate::campaign::CampaignId;

/// A ranking query against one campaign.
///
/// Results are always ordered by the composite rank key; there is no way to
/// ask for a different order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankQuery {
    /// Campaign whose posts are ranked
    pub campaign_id: CampaignId,
    /// Only posts with at least this many votes
    pub min_votes: u64,
    /// Maximum number of results (top-N)
    pub limit: Option<usize>,
}

impl RankQuery {
    /// All posts of a campaign
    pub fn campaign(campaign_id: CampaignId) -> Self {
        Self {
            campaign_id,
            min_votes: 0,
            limit: None,
        }
    }

    pub fn min_votes(mut self, min_votes: u64) -> Self {
        self.min_votes = min_votes;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
