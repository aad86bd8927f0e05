//! Campaign validation errors
//!
//! Validation never short-circuits: a rejected draft reports every rule it
//! broke, in rule order.
//!
//! Failure codes:
//! - CAMPAIGN_MISSING_TITLE
//! - CAMPAIGN_MISSING_DESCRIPTION
//! - CAMPAIGN_MISSING_OR_UNKNOWN_COMPANY
//! - CAMPAIGN_MISSING_START_TIME
//! - CAMPAIGN_MISSING_END_TIME
//! - CAMPAIGN_START_TIME_IN_PAST
//! - CAMPAIGN_END_TIME_NOT_AFTER_START_TIME

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A single broken campaign rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValidationFailure {
    MissingTitle,
    MissingDescription,
    MissingOrUnknownCompany,
    MissingStartTime,
    MissingEndTime,
    StartTimeInPast,
    EndTimeNotAfterStartTime,
}

impl ValidationFailure {
    /// Returns the stable failure code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationFailure::MissingTitle => "CAMPAIGN_MISSING_TITLE",
            ValidationFailure::MissingDescription => "CAMPAIGN_MISSING_DESCRIPTION",
            ValidationFailure::MissingOrUnknownCompany => "CAMPAIGN_MISSING_OR_UNKNOWN_COMPANY",
            ValidationFailure::MissingStartTime => "CAMPAIGN_MISSING_START_TIME",
            ValidationFailure::MissingEndTime => "CAMPAIGN_MISSING_END_TIME",
            ValidationFailure::StartTimeInPast => "CAMPAIGN_START_TIME_IN_PAST",
            ValidationFailure::EndTimeNotAfterStartTime => {
                "CAMPAIGN_END_TIME_NOT_AFTER_START_TIME"
            }
        }
    }

    /// Returns a human-readable description of the broken rule
    pub fn describe(&self) -> &'static str {
        match self {
            ValidationFailure::MissingTitle => "title is required",
            ValidationFailure::MissingDescription => "description is required",
            ValidationFailure::MissingOrUnknownCompany => {
                "company_id is required and must reference an existing company"
            }
            ValidationFailure::MissingStartTime => "starttime is required",
            ValidationFailure::MissingEndTime => "endtime is required",
            ValidationFailure::StartTimeInPast => "starttime must not be before the creation time",
            ValidationFailure::EndTimeNotAfterStartTime => "endtime must be after starttime",
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.describe())
    }
}

/// Campaign construction rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("campaign rejected: {}", format_reasons(.reasons))]
pub struct ValidationError {
    reasons: Vec<ValidationFailure>,
}

impl ValidationError {
    /// Creates an error from a non-empty list of failures
    pub fn new(reasons: Vec<ValidationFailure>) -> Self {
        debug_assert!(!reasons.is_empty());
        Self { reasons }
    }

    /// All broken rules, in rule order
    pub fn reasons(&self) -> &[ValidationFailure] {
        &self.reasons
    }

    /// Whether the given rule is among the failures
    pub fn contains(&self, failure: ValidationFailure) -> bool {
        self.reasons.contains(&failure)
    }

    /// Failure codes, in rule order
    pub fn codes(&self) -> Vec<&'static str> {
        self.reasons.iter().map(ValidationFailure::code).collect()
    }
}

fn format_reasons(reasons: &[ValidationFailure]) -> String {
    reasons
        .iter()
        .map(ValidationFailure::code)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for campaign validation
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_all_codes() {
        let err = ValidationError::new(vec![
            ValidationFailure::MissingTitle,
            ValidationFailure::EndTimeNotAfterStartTime,
        ]);
        let display = err.to_string();
        assert!(display.contains("CAMPAIGN_MISSING_TITLE"));
        assert!(display.contains("CAMPAIGN_END_TIME_NOT_AFTER_START_TIME"));
    }

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            ValidationFailure::MissingTitle,
            ValidationFailure::MissingDescription,
            ValidationFailure::MissingOrUnknownCompany,
            ValidationFailure::MissingStartTime,
            ValidationFailure::MissingEndTime,
            ValidationFailure::StartTimeInPast,
            ValidationFailure::EndTimeNotAfterStartTime,
        ];
        let mut codes: Vec<_> = all.iter().map(|f| f.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
