//! Asynchronous indexing pipeline
//!
//! Writes flow through three stages:
//!
//! 1. Accepted: `RankIndex::upsert` assigns a sequence number and enqueues
//!    the write. Sequence order equals channel order.
//! 2. Applied: the indexer task applies writes, in sequence order, to the
//!    staged per-campaign trees and publishes the last applied sequence.
//! 3. Visible: `RankIndex::refresh` swaps the staged trees of changed
//!    campaigns into the snapshot that queries read.
//!
//! Only stage 3 is observable by queries.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};

use super::btree::{RankEntry, RankTree};
use crate::campaign::CampaignId;
use crate::observability::Event;

/// An accepted write waiting to be applied.
#[derive(Debug, Clone, Copy)]
pub(super) struct PendingWrite {
    pub seq: u64,
    pub entry: RankEntry,
}

/// Whether the indexer task applies writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Writes are applied as they arrive.
    Running,
    /// Writes queue up; nothing is applied until resumed.
    Suspended,
}

/// Applied-but-not-yet-visible index state.
#[derive(Debug, Default)]
pub(super) struct StagedSegments {
    segments: HashMap<CampaignId, RankTree>,
    /// Campaigns changed since the last publish
    dirty: BTreeSet<CampaignId>,
    applied_seq: u64,
}

impl StagedSegments {
    /// Applies one write. Writes must arrive in sequence order.
    pub fn apply(&mut self, write: PendingWrite) {
        debug_assert!(write.seq > self.applied_seq);
        let campaign_id = write.entry.campaign_id;
        self.segments
            .entry(campaign_id)
            .or_default()
            .upsert(write.entry);
        self.dirty.insert(campaign_id);
        self.applied_seq = write.seq;
    }

    /// Last applied sequence number
    pub fn applied_seq(&self) -> u64 {
        self.applied_seq
    }

    /// Copies out the trees of every campaign changed since the last call.
    pub fn take_dirty(&mut self) -> Vec<(CampaignId, RankTree)> {
        let dirty = std::mem::take(&mut self.dirty);
        dirty
            .into_iter()
            .filter_map(|id| self.segments.get(&id).map(|tree| (id, tree.clone())))
            .collect()
    }
}

/// Indexer task body.
///
/// Runs until every sender of `writes` is dropped. Each applied write is
/// acknowledged through `applied`.
pub(super) async fn run_indexer(
    mut writes: mpsc::UnboundedReceiver<PendingWrite>,
    staged: Arc<Mutex<StagedSegments>>,
    applied: watch::Sender<u64>,
    mut state: watch::Receiver<PipelineState>,
) {
    tracing::debug!(event = %Event::IndexerStarted, "indexer started");

    while let Some(write) = writes.recv().await {
        // Hold the write until the pipeline runs again
        if state
            .wait_for(|s| *s == PipelineState::Running)
            .await
            .is_err()
        {
            break;
        }

        let seq = write.seq;
        match staged.lock() {
            Ok(mut segments) => segments.apply(write),
            Err(poisoned) => poisoned.into_inner().apply(write),
        }
        applied.send_replace(seq);
    }

    tracing::debug!(event = %Event::IndexerStopped, "indexer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostId;
    use chrono::Utc;

    fn write(seq: u64, campaign: u64, post: u64, votes: u64) -> PendingWrite {
        PendingWrite {
            seq,
            entry: RankEntry::new(CampaignId(campaign), PostId(post), votes, Utc::now()),
        }
    }

    #[test]
    fn test_apply_tracks_dirty_campaigns() {
        let mut staged = StagedSegments::default();
        staged.apply(write(1, 1, 10, 0));
        staged.apply(write(2, 2, 20, 0));
        staged.apply(write(3, 1, 11, 0));

        assert_eq!(staged.applied_seq(), 3);
        let dirty = staged.take_dirty();
        let ids: Vec<_> = dirty.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(dirty[0].1.len(), 2);

        // Drained
        assert!(staged.take_dirty().is_empty());
    }

    #[test]
    fn test_same_post_last_write_wins() {
        let mut staged = StagedSegments::default();
        staged.apply(write(1, 1, 10, 1));
        staged.apply(write(2, 1, 10, 3));
        staged.apply(write(3, 1, 10, 2));

        let dirty = staged.take_dirty();
        let tree = &dirty[0].1;
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(PostId(10)).map(|e| e.vote_count), Some(2));
    }

    #[tokio::test]
    async fn test_indexer_applies_and_acknowledges() {
        let (tx, rx) = mpsc::unbounded_channel();
        let staged = Arc::new(Mutex::new(StagedSegments::default()));
        let (applied_tx, mut applied_rx) = watch::channel(0u64);
        let (_state_tx, state_rx) = watch::channel(PipelineState::Running);

        let task = tokio::spawn(run_indexer(rx, Arc::clone(&staged), applied_tx, state_rx));

        tx.send(write(1, 1, 10, 0)).unwrap();
        tx.send(write(2, 1, 11, 0)).unwrap();

        applied_rx.wait_for(|seq| *seq >= 2).await.unwrap();
        assert_eq!(staged.lock().unwrap().applied_seq(), 2);

        drop(tx);
        task.await.unwrap();
    }
}
