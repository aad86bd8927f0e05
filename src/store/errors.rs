//! # Store Errors

use thiserror::Error;

use crate::campaign::{CampaignId, CompanyId, ValidationError};
use crate::post::PostId;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Campaign draft failed validation; nothing was stored
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown company: {0}")]
    UnknownCompany(CompanyId),

    #[error("unknown campaign: {0}")]
    UnknownCampaign(CampaignId),

    #[error("unknown post: {0}")]
    UnknownPost(PostId),

    /// A record with this id already exists
    #[error("duplicate {kind} id: {id}")]
    Duplicate { kind: &'static str, id: u64 },

    #[error("store lock poisoned: {0}")]
    LockPoisoned(&'static str),

    #[error("failed to read fixtures: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid fixtures: {0}")]
    Fixture(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "STORE_VALIDATION_FAILED",
            StoreError::UnknownCompany(_) => "STORE_UNKNOWN_COMPANY",
            StoreError::UnknownCampaign(_) => "STORE_UNKNOWN_CAMPAIGN",
            StoreError::UnknownPost(_) => "STORE_UNKNOWN_POST",
            StoreError::Duplicate { .. } => "STORE_DUPLICATE_ID",
            StoreError::LockPoisoned(_) => "STORE_LOCK_POISONED",
            StoreError::Io(_) => "STORE_IO_ERROR",
            StoreError::Fixture(_) => "STORE_INVALID_FIXTURES",
        }
    }

    /// The validation failure, if this error is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            StoreError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
