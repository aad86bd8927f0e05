//! In-memory vote ledger

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use super::errors::{LedgerError, LedgerResult};
use super::{VoteLedger, VoterId};
use crate::post::PostId;

/// Vote ledger keeping one voter set per post.
#[derive(Debug, Default)]
pub struct InMemoryVoteLedger {
    votes: RwLock<HashMap<PostId, HashSet<VoterId>>>,
}

impl InMemoryVoteLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VoteLedger for InMemoryVoteLedger {
    fn cast_vote(&self, voter_id: VoterId, post_id: PostId) -> LedgerResult<u64> {
        let mut votes = self
            .votes
            .write()
            .map_err(|_| LedgerError::Unavailable("ledger lock poisoned".into()))?;

        let voters = votes.entry(post_id).or_default();
        if !voters.insert(voter_id) {
            return Err(LedgerError::AlreadyVoted { voter_id, post_id });
        }
        Ok(voters.len() as u64)
    }

    fn vote_count(&self, post_id: PostId) -> LedgerResult<u64> {
        let votes = self
            .votes
            .read()
            .map_err(|_| LedgerError::Unavailable("ledger lock poisoned".into()))?;
        Ok(votes.get(&post_id).map_or(0, |voters| voters.len() as u64))
    }
}
