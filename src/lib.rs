//! campaignrank - vote-ranked posts per marketing campaign
//!
//! Companies run time-boxed campaigns; users submit posts and vote on them.
//! Posts are ranked per campaign by vote count, oldest first on ties, through
//! an index whose writes become visible only after an explicit refresh.

pub mod campaign;
pub mod cli;
pub mod index;
pub mod ledger;
pub mod observability;
pub mod post;
pub mod ranking;
pub mod store;
