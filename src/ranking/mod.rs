//! Campaign ranking
//!
//! Data flow:
//!
//! 1. `VoteRecorder::cast_vote` updates the ledger, writes the new count
//!    back to the store and upserts the post into the rank index
//! 2. The caller refreshes the index (`RankIndex::refresh`)
//! 3. `CampaignRankingService::top_posts` queries the refreshed index
//!
//! Collaborators are injected through constructors; nothing here reaches
//! for global state.

mod errors;
mod service;
mod votes;

pub use errors::{RankingError, RankingResult};
pub use service::{CampaignRankingService, RankedPost};
pub use votes::VoteRecorder;
