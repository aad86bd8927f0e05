//! In-memory campaign store
//!
//! Records live in `BTreeMap`s so every listing comes back in id order.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use super::CampaignRepository;
use crate::campaign::{
    Campaign, CampaignDraft, CampaignId, CampaignValidator, CompanyDirectory, CompanyId,
};
use crate::observability::{Event, MetricsRegistry};
use crate::post::{Post, PostId};

/// A company owning campaigns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
}

/// Thread-safe in-memory store of companies, campaigns and posts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    companies: RwLock<BTreeMap<CompanyId, Company>>,
    campaigns: RwLock<BTreeMap<CampaignId, Campaign>>,
    posts: RwLock<BTreeMap<PostId, Post>>,
    metrics: Arc<MetricsRegistry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store reporting into a shared metrics registry
    pub fn with_metrics(metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    /// Registers a company under the next free id
    pub fn add_company(&self, name: impl Into<String>) -> StoreResult<Company> {
        let mut companies = self
            .companies
            .write()
            .map_err(|_| StoreError::LockPoisoned("companies"))?;
        let id = CompanyId(companies.keys().next_back().map_or(1, |id| id.0 + 1));
        let company = Company {
            id,
            name: name.into(),
        };
        companies.insert(id, company.clone());
        Ok(company)
    }

    /// Registers a company under its own id
    pub fn insert_company(&self, company: Company) -> StoreResult<()> {
        let mut companies = self
            .companies
            .write()
            .map_err(|_| StoreError::LockPoisoned("companies"))?;
        if companies.contains_key(&company.id) {
            return Err(StoreError::Duplicate {
                kind: "company",
                id: company.id.0,
            });
        }
        companies.insert(company.id, company);
        Ok(())
    }

    /// Validates a draft at creation instant `now` and stores the campaign
    /// under the next free id.
    ///
    /// # Errors
    ///
    /// `Validation` with every broken rule; the store is left unchanged.
    pub fn create_campaign(&self, draft: CampaignDraft, now: DateTime<Utc>) -> StoreResult<Campaign> {
        let mut campaigns = self
            .campaigns
            .write()
            .map_err(|_| StoreError::LockPoisoned("campaigns"))?;
        let id = CampaignId(campaigns.keys().next_back().map_or(1, |id| id.0 + 1));
        let companies = self
            .companies
            .read()
            .map_err(|_| StoreError::LockPoisoned("companies"))?;

        let known = KnownCompanies(&companies);
        let validator = CampaignValidator::new(&known);
        let campaign = match validator.build(id, draft, now) {
            Ok(campaign) => campaign,
            Err(err) => {
                self.metrics.increment_campaigns_rejected();
                tracing::info!(
                    event = %Event::CampaignRejected,
                    reasons = ?err.codes(),
                    "campaign rejected"
                );
                return Err(err.into());
            }
        };

        campaigns.insert(id, campaign.clone());
        self.metrics.increment_campaigns_created();
        tracing::info!(
            event = %Event::CampaignCreated,
            campaign_id = %id,
            company_id = %campaign.company_id(),
            "campaign created"
        );
        Ok(campaign)
    }

    /// Loads back a campaign created earlier, keeping its id.
    ///
    /// Applies every rule except the creation-instant check.
    pub fn restore_campaign(&self, id: CampaignId, draft: CampaignDraft) -> StoreResult<Campaign> {
        let mut campaigns = self
            .campaigns
            .write()
            .map_err(|_| StoreError::LockPoisoned("campaigns"))?;
        if campaigns.contains_key(&id) {
            return Err(StoreError::Duplicate {
                kind: "campaign",
                id: id.0,
            });
        }

        let companies = self
            .companies
            .read()
            .map_err(|_| StoreError::LockPoisoned("companies"))?;
        let campaign =
            CampaignValidator::new(&KnownCompanies(&companies)).build_restored(id, draft)?;
        campaigns.insert(id, campaign.clone());
        Ok(campaign)
    }

    /// Whether a company with this id is stored
    pub fn has_company(&self, id: CompanyId) -> StoreResult<bool> {
        self.companies
            .read()
            .map(|companies| companies.contains_key(&id))
            .map_err(|_| StoreError::LockPoisoned("companies"))
    }

    /// Campaigns owned by a company
    pub fn company_campaigns(&self, company_id: CompanyId) -> StoreResult<Vec<Campaign>> {
        if !self.has_company(company_id)? {
            return Err(StoreError::UnknownCompany(company_id));
        }
        let campaigns = self
            .campaigns
            .read()
            .map_err(|_| StoreError::LockPoisoned("campaigns"))?;
        Ok(campaigns
            .values()
            .filter(|c| c.company_id() == company_id)
            .cloned()
            .collect())
    }

    /// Submits a new post under the next free id.
    pub fn submit_post(
        &self,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
        campaign_ids: Vec<CampaignId>,
    ) -> StoreResult<Post> {
        self.ensure_campaigns_exist(&campaign_ids)?;
        let mut posts = self
            .posts
            .write()
            .map_err(|_| StoreError::LockPoisoned("posts"))?;
        let id = PostId(posts.keys().next_back().map_or(1, |id| id.0 + 1));
        let post = Post::new(id, title, created_at, campaign_ids);
        posts.insert(id, post.clone());
        Ok(post)
    }

    /// Stores a post under its own id
    pub fn insert_post(&self, post: Post) -> StoreResult<()> {
        self.ensure_campaigns_exist(&post.campaign_ids)?;
        let mut posts = self
            .posts
            .write()
            .map_err(|_| StoreError::LockPoisoned("posts"))?;
        if posts.contains_key(&post.id) {
            return Err(StoreError::Duplicate {
                kind: "post",
                id: post.id.0,
            });
        }
        posts.insert(post.id, post);
        Ok(())
    }

    fn ensure_campaigns_exist(&self, campaign_ids: &[CampaignId]) -> StoreResult<()> {
        let campaigns = self
            .campaigns
            .read()
            .map_err(|_| StoreError::LockPoisoned("campaigns"))?;
        match campaign_ids.iter().find(|id| !campaigns.contains_key(id)) {
            Some(missing) => Err(StoreError::UnknownCampaign(*missing)),
            None => Ok(()),
        }
    }
}

/// Company lookup over an already-locked company map
struct KnownCompanies<'a>(&'a BTreeMap<CompanyId, Company>);

impl CompanyDirectory for KnownCompanies<'_> {
    fn company_exists(&self, id: CompanyId) -> bool {
        self.0.contains_key(&id)
    }
}

/// Campaign creation does not go through this impl; it locks the company
/// map itself so a poisoned lock surfaces as `LockPoisoned`.
impl CompanyDirectory for MemoryStore {
    fn company_exists(&self, id: CompanyId) -> bool {
        match self.companies.read() {
            Ok(companies) => companies.contains_key(&id),
            Err(_) => {
                tracing::warn!(company_id = %id, "companies lock poisoned");
                false
            }
        }
    }
}

impl CampaignRepository for MemoryStore {
    fn campaign(&self, id: CampaignId) -> StoreResult<Option<Campaign>> {
        let campaigns = self
            .campaigns
            .read()
            .map_err(|_| StoreError::LockPoisoned("campaigns"))?;
        Ok(campaigns.get(&id).cloned())
    }

    fn campaign_posts(&self, id: CampaignId) -> StoreResult<Vec<Post>> {
        let posts = self
            .posts
            .read()
            .map_err(|_| StoreError::LockPoisoned("posts"))?;
        Ok(posts.values().filter(|p| p.belongs_to(id)).cloned().collect())
    }

    fn post(&self, id: PostId) -> StoreResult<Option<Post>> {
        let posts = self
            .posts
            .read()
            .map_err(|_| StoreError::LockPoisoned("posts"))?;
        Ok(posts.get(&id).cloned())
    }

    fn update_vote_count(&self, id: PostId, vote_count: u64) -> StoreResult<Post> {
        let mut posts = self
            .posts
            .write()
            .map_err(|_| StoreError::LockPoisoned("posts"))?;
        let post = posts.get_mut(&id).ok_or(StoreError::UnknownPost(id))?;
        post.vote_count = vote_count;
        Ok(post.clone())
    }
}
