//! Campaign ranking service
//!
//! Answers "top posts for campaign C with at least M votes" from the rank
//! index and hydrates the hits from the repository.
//!
//! The service never refreshes the index itself. Callers batch their vote
//! mutations and refresh once before querying when they need current results.

use std::sync::Arc;

use serde::Serialize;

use super::errors::{RankingError, RankingResult};
use crate::campaign::CampaignId;
use crate::index::{RankEntry, RankIndex, RankQuery};
use crate::observability::Event;
use crate::post::Post;
use crate::store::CampaignRepository;

/// A post at its ranking position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPost {
    /// 1-based position
    pub rank: usize,
    /// Vote count the ranking was computed from (as of the last refresh)
    pub vote_count: u64,
    pub post: Post,
}

/// Ranks a campaign's posts through a shared rank index.
pub struct CampaignRankingService<R: CampaignRepository> {
    repository: Arc<R>,
    index: Arc<RankIndex>,
}

impl<R: CampaignRepository> CampaignRankingService<R> {
    pub fn new(repository: Arc<R>, index: Arc<RankIndex>) -> Self {
        Self { repository, index }
    }

    pub fn index(&self) -> &Arc<RankIndex> {
        &self.index
    }

    /// Posts of the campaign with at least `min_votes` votes, best first.
    ///
    /// # Errors
    ///
    /// - `UnknownCampaign` if the campaign does not exist
    /// - `PostNotFound` if the index names a post the repository lacks
    /// - index and store failures, unchanged
    pub fn top_posts(&self, campaign_id: CampaignId, min_votes: u64) -> RankingResult<Vec<RankedPost>> {
        self.top_posts_limited(campaign_id, min_votes, None)
    }

    /// Like `top_posts`, capped at `limit` results.
    pub fn top_posts_limited(
        &self,
        campaign_id: CampaignId,
        min_votes: u64,
        limit: Option<usize>,
    ) -> RankingResult<Vec<RankedPost>> {
        self.ensure_campaign(campaign_id)?;

        let mut query = RankQuery::campaign(campaign_id).min_votes(min_votes);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let hits = self.index.query(&query)?;

        let ranked = hits
            .iter()
            .enumerate()
            .map(|(position, hit)| -> RankingResult<RankedPost> {
                let post = self
                    .repository
                    .post(hit.post_id)?
                    .ok_or(RankingError::PostNotFound(hit.post_id))?;
                Ok(RankedPost {
                    rank: position + 1,
                    vote_count: hit.vote_count,
                    post,
                })
            })
            .collect::<RankingResult<Vec<_>>>()?;

        self.index.metrics().increment_queries_executed();
        tracing::debug!(
            event = %Event::QueryExecuted,
            campaign_id = %campaign_id,
            min_votes,
            hits = ranked.len(),
            "top posts"
        );
        Ok(ranked)
    }

    /// Re-imports every post of the campaign from the repository.
    ///
    /// The imported entries become visible after the next refresh. Returns
    /// the number of posts imported. Vote syncs wait while the posts are read
    /// and imported, so no synced count is overwritten by an older read.
    pub fn reindex_campaign(&self, campaign_id: CampaignId) -> RankingResult<usize> {
        self.ensure_campaign(campaign_id)?;

        let count = {
            let _guard = self.index.source_guard()?;
            let posts = self.repository.campaign_posts(campaign_id)?;
            self.index.import(
                posts
                    .iter()
                    .map(|p| RankEntry::new(campaign_id, p.id, p.vote_count, p.created_at)),
            )?;
            posts.len()
        };

        tracing::info!(
            event = %Event::CampaignReindexed,
            campaign_id = %campaign_id,
            posts = count,
            "campaign reindexed"
        );
        Ok(count)
    }

    fn ensure_campaign(&self, campaign_id: CampaignId) -> RankingResult<()> {
        if self.repository.campaign(campaign_id)?.is_some() {
            return Ok(());
        }
        self.index.metrics().increment_queries_rejected();
        tracing::info!(
            event = %Event::QueryRejected,
            campaign_id = %campaign_id,
            "unknown campaign"
        );
        Err(RankingError::UnknownCampaign(campaign_id))
    }
}
