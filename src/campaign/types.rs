//! Campaign type definitions
//!
//! A `CampaignDraft` is the unvalidated set of proposed field values. A
//! `Campaign` only exists once a draft has passed validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a company owning campaigns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub u64);

/// Identifier of a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub u64);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Proposed campaign field values.
///
/// Every field is optional so that absence can be reported by the validator
/// rather than rejected by the deserializer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub starttime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub endtime: Option<DateTime<Utc>>,
}

impl CampaignDraft {
    /// Creates an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn starttime(mut self, starttime: DateTime<Utc>) -> Self {
        self.starttime = Some(starttime);
        self
    }

    pub fn endtime(mut self, endtime: DateTime<Utc>) -> Self {
        self.endtime = Some(endtime);
        self
    }
}

/// A validated campaign.
///
/// Fields are private: the only way to obtain a `Campaign` is through
/// `CampaignValidator`, so the active window is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Campaign {
    id: CampaignId,
    company_id: CompanyId,
    title: String,
    description: String,
    starttime: DateTime<Utc>,
    endtime: DateTime<Utc>,
}

impl Campaign {
    pub(super) fn from_validated(
        id: CampaignId,
        company_id: CompanyId,
        title: String,
        description: String,
        starttime: DateTime<Utc>,
        endtime: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            company_id,
            title,
            description,
            starttime,
            endtime,
        }
    }

    pub fn id(&self) -> CampaignId {
        self.id
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn starttime(&self) -> DateTime<Utc> {
        self.starttime
    }

    pub fn endtime(&self) -> DateTime<Utc> {
        self.endtime
    }

    /// Whether `instant` falls inside `[starttime, endtime)`.
    ///
    /// Ranking does not consult this; callers decide whether an elapsed
    /// campaign should still be ranked.
    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        self.starttime <= instant && instant < self.endtime
    }
}
