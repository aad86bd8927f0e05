//! JSON fixtures
//!
//! A fixture file describes companies, campaigns, posts and the votes cast
//! on them:
//!
//! ```json
//! {
//!   "companies": [{"id": 1, "name": "apple"}],
//!   "campaigns": [{"id": 2, "company_id": 1, "title": "t", "description": "d",
//!                  "starttime": "2024-01-01T00:00:00Z", "endtime": "2024-02-01T00:00:00Z"}],
//!   "posts": [{"id": 1, "title": "leader", "created_at": "2024-01-02T00:00:00Z", "campaign_ids": [2]}],
//!   "votes": [{"voter_id": 1, "post_id": 1}]
//! }
//! ```
//!
//! Campaigns are validated as restored records. Votes are not applied by
//! `install`; they are replayed through the vote ledger by the caller.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use super::memory::{Company, MemoryStore};
use super::CampaignRepository;
use crate::campaign::{
    CampaignDraft, CampaignId, CampaignValidator, CompanyDirectory, CompanyId,
};
use crate::ledger::VoterId;
use crate::observability::Event;
use crate::post::{Post, PostId};

/// A stored campaign: its id plus the original field values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignFixture {
    pub id: CampaignId,
    #[serde(flatten)]
    pub draft: CampaignDraft,
}

/// One vote to replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteFixture {
    pub voter_id: VoterId,
    pub post_id: PostId,
}

/// Contents of a fixture file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub campaigns: Vec<CampaignFixture>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub votes: Vec<VoteFixture>,
}

impl Fixtures {
    /// Parses fixtures from a JSON string
    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads fixtures from a JSON file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Inserts companies, campaigns and posts, in that order.
    ///
    /// Every record is checked against the store and the rest of the file
    /// first; a file with a bad record inserts nothing. Post vote counts are
    /// reset to zero; the ledger replay sets them.
    pub fn install(&self, store: &MemoryStore) -> StoreResult<()> {
        self.check(store)?;

        for company in &self.companies {
            store.insert_company(company.clone())?;
        }
        for campaign in &self.campaigns {
            store.restore_campaign(campaign.id, campaign.draft.clone())?;
        }
        for post in &self.posts {
            store.insert_post(Post {
                vote_count: 0,
                ..post.clone()
            })?;
        }

        tracing::info!(
            event = %Event::FixturesLoaded,
            companies = self.companies.len(),
            campaigns = self.campaigns.len(),
            posts = self.posts.len(),
            votes = self.votes.len(),
            "fixtures loaded"
        );
        Ok(())
    }

    /// Rejects duplicate ids, invalid campaigns and posts under unknown
    /// campaigns, without touching the store.
    fn check(&self, store: &MemoryStore) -> StoreResult<()> {
        let mut companies = HashSet::new();
        for company in &self.companies {
            if !companies.insert(company.id) || store.has_company(company.id)? {
                return Err(StoreError::Duplicate {
                    kind: "company",
                    id: company.id.0,
                });
            }
        }

        let mut known = KnownCompanies(companies);
        for company_id in self.campaigns.iter().filter_map(|c| c.draft.company_id) {
            if store.has_company(company_id)? {
                known.0.insert(company_id);
            }
        }

        let validator = CampaignValidator::new(&known);
        let mut campaigns = HashSet::new();
        for campaign in &self.campaigns {
            if !campaigns.insert(campaign.id) || store.campaign(campaign.id)?.is_some() {
                return Err(StoreError::Duplicate {
                    kind: "campaign",
                    id: campaign.id.0,
                });
            }
            validator.validate_restored(&campaign.draft)?;
        }

        let mut posts = HashSet::new();
        for post in &self.posts {
            if !posts.insert(post.id) || store.post(post.id)?.is_some() {
                return Err(StoreError::Duplicate {
                    kind: "post",
                    id: post.id.0,
                });
            }
            for campaign_id in &post.campaign_ids {
                if !campaigns.contains(campaign_id) && store.campaign(*campaign_id)?.is_none() {
                    return Err(StoreError::UnknownCampaign(*campaign_id));
                }
            }
        }

        Ok(())
    }
}

/// Companies known to the store or declared in the same file
struct KnownCompanies(HashSet<CompanyId>);

impl CompanyDirectory for KnownCompanies {
    fn company_exists(&self, id: CompanyId) -> bool {
        self.0.contains(&id)
    }
}
