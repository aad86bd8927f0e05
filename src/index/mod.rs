//! Rank index subsystem
//!
//! The rank index is a derived, in-memory projection of post vote counts,
//! partitioned by campaign. It is never the source of truth for a vote count.
//!
//! # Design Principles
//!
//! - Two-phase writes: `upsert` accepts, `refresh` makes visible
//! - Explicit ordering: vote count descending, then creation time ascending,
//!   then post id ascending; no relevance scoring
//! - Deterministic: re-running a query without intervening refresh returns
//!   the identical sequence
//!
//! # Invariants
//!
//! - After `refresh` returns, every write accepted before it is visible
//! - Writes to the same post apply in the order they were accepted
//! - Campaigns never share ranking state

mod btree;
mod config;
mod errors;
mod manager;
mod pipeline;
mod query;

pub use btree::{RankEntry, RankKey, RankTree};
pub use config::{IndexConfig, DEFAULT_REFRESH_TIMEOUT};
pub use errors::{IndexError, IndexResult};
pub use manager::{IndexStats, RankIndex, RefreshStats};
pub use pipeline::PipelineState;
pub use query::RankQuery;
