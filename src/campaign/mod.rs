//! Campaign subsystem
//!
//! A campaign is a time-boxed promotion owned by a company. Construction goes
//! through `CampaignValidator`; a `Campaign` value therefore always has a
//! well-formed active window (`endtime > starttime`).

mod errors;
mod types;
mod validator;

pub use errors::{ValidationError, ValidationFailure, ValidationResult};
pub use types::{Campaign, CampaignDraft, CampaignId, CompanyId};
pub use validator::{CampaignValidator, CompanyDirectory};
