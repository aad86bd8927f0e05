//! Campaign validator
//!
//! Rules, each checked independently:
//! - title present and non-blank
//! - description present and non-blank
//! - company_id present and known to the company directory
//! - starttime present
//! - endtime present
//! - starttime not before the creation instant
//! - endtime strictly after starttime
//!
//! The validator has no side effects. A draft that breaks any rule never
//! becomes a `Campaign`.

use chrono::{DateTime, Utc};

use super::errors::{ValidationError, ValidationFailure, ValidationResult};
use super::types::{Campaign, CampaignDraft, CampaignId, CompanyId};

/// Lookup of existing companies.
///
/// Implemented by whatever owns company records.
pub trait CompanyDirectory {
    /// Whether a company with this id exists
    fn company_exists(&self, id: CompanyId) -> bool;
}

/// Validates campaign drafts against a company directory.
pub struct CampaignValidator<'a, D: CompanyDirectory + ?Sized> {
    companies: &'a D,
}

impl<'a, D: CompanyDirectory + ?Sized> CampaignValidator<'a, D> {
    /// Creates a validator backed by the given company directory.
    pub fn new(companies: &'a D) -> Self {
        Self { companies }
    }

    /// Checks a draft for creation at instant `now`.
    ///
    /// # Errors
    ///
    /// Returns every broken rule in a single `ValidationError`.
    pub fn validate(&self, draft: &CampaignDraft, now: DateTime<Utc>) -> ValidationResult<()> {
        into_result(self.collect_failures(draft, Some(now)))
    }

    /// Checks a campaign that was created earlier and is being loaded back.
    ///
    /// Same rules as `validate` except the creation-instant check, which
    /// only holds at the moment of creation.
    pub fn validate_restored(&self, draft: &CampaignDraft) -> ValidationResult<()> {
        into_result(self.collect_failures(draft, None))
    }

    /// Validates a draft and builds the campaign under the given id.
    pub fn build(
        &self,
        id: CampaignId,
        draft: CampaignDraft,
        now: DateTime<Utc>,
    ) -> ValidationResult<Campaign> {
        self.validate(&draft, now)?;
        Ok(assemble(id, draft))
    }

    /// Validates a restored campaign and builds it under its stored id.
    pub fn build_restored(&self, id: CampaignId, draft: CampaignDraft) -> ValidationResult<Campaign> {
        self.validate_restored(&draft)?;
        Ok(assemble(id, draft))
    }

    fn collect_failures(
        &self,
        draft: &CampaignDraft,
        now: Option<DateTime<Utc>>,
    ) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        if is_blank(draft.title.as_deref()) {
            failures.push(ValidationFailure::MissingTitle);
        }
        if is_blank(draft.description.as_deref()) {
            failures.push(ValidationFailure::MissingDescription);
        }
        match draft.company_id {
            Some(id) if self.companies.company_exists(id) => {}
            _ => failures.push(ValidationFailure::MissingOrUnknownCompany),
        }
        if draft.starttime.is_none() {
            failures.push(ValidationFailure::MissingStartTime);
        }
        if draft.endtime.is_none() {
            failures.push(ValidationFailure::MissingEndTime);
        }

        // Absent times were reported above
        if let (Some(start), Some(now)) = (draft.starttime, now) {
            if start < now {
                failures.push(ValidationFailure::StartTimeInPast);
            }
        }
        if let (Some(start), Some(end)) = (draft.starttime, draft.endtime) {
            if end <= start {
                failures.push(ValidationFailure::EndTimeNotAfterStartTime);
            }
        }

        failures
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn into_result(failures: Vec<ValidationFailure>) -> ValidationResult<()> {
    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(failures))
    }
}

/// Moves the draft's values into a campaign. Only called after validation.
fn assemble(id: CampaignId, draft: CampaignDraft) -> Campaign {
    Campaign::from_validated(
        id,
        draft.company_id.unwrap_or(CompanyId(0)),
        draft.title.unwrap_or_default(),
        draft.description.unwrap_or_default(),
        draft.starttime.unwrap_or_default(),
        draft.endtime.unwrap_or_default(),
    )
}
