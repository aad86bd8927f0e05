//! Rank index
//!
//! # API
//!
//! - `upsert(entry)` - Accept a write into the pending pipeline
//! - `import(entries)` - Accept a batch of writes
//! - `refresh()` - Wait for accepted writes, then make them visible
//! - `query(query)` - Ranked entries as of the last completed refresh
//! - `suspend()` / `resume()` - Pause and restart the indexer
//! - `stats()` - Sequence numbers and pending counts
//!
//! # Consistency
//!
//! Queries read an immutable snapshot swapped in by `refresh`. A query never
//! waits for the indexer. Once `refresh` returns, every write accepted before
//! it was called is visible; writes accepted while it waited may be visible
//! too, if the indexer had already applied them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Instant;

use serde::Serialize;
use tokio::sync::{mpsc, watch};

use super::btree::{RankEntry, RankTree};
use super::config::IndexConfig;
use super::errors::{IndexError, IndexResult};
use super::pipeline::{run_indexer, PendingWrite, PipelineState, StagedSegments};
use super::query::RankQuery;
use crate::campaign::CampaignId;
use crate::observability::{Event, MetricsRegistry};

/// Sending half of the pipeline plus the last issued sequence number.
///
/// Held under one lock so that sequence order equals channel order.
struct WriteQueue {
    last_seq: u64,
    tx: mpsc::UnboundedSender<PendingWrite>,
}

/// What queries see.
#[derive(Debug, Default)]
struct IndexSnapshot {
    generation: u64,
    visible_seq: u64,
    campaigns: HashMap<CampaignId, Arc<RankTree>>,
}

/// Outcome of a completed refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshStats {
    /// Snapshot generation now visible
    pub generation: u64,
    /// Every write with a sequence number up to this one is visible
    pub visible_seq: u64,
    /// Campaigns whose trees were swapped in
    pub campaigns_published: usize,
}

/// Point-in-time pipeline counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub accepted_seq: u64,
    pub applied_seq: u64,
    pub visible_seq: u64,
    /// Accepted writes not yet visible
    pub pending: u64,
    pub generation: u64,
    pub campaigns: usize,
    pub suspended: bool,
}

/// Per-campaign ranking index with explicit write visibility.
pub struct RankIndex {
    config: IndexConfig,
    writer: Mutex<WriteQueue>,
    applied: watch::Receiver<u64>,
    state: watch::Sender<PipelineState>,
    staged: Arc<Mutex<StagedSegments>>,
    visible: RwLock<Arc<IndexSnapshot>>,
    /// Held across "read counts from the source, then import them"
    sources: Mutex<()>,
    metrics: Arc<MetricsRegistry>,
}

impl RankIndex {
    /// Starts an index and its indexer task on the current tokio runtime.
    pub fn start(config: IndexConfig) -> IndexResult<Self> {
        Self::start_with_metrics(config, Arc::new(MetricsRegistry::new()))
    }

    /// Starts an index reporting into a shared metrics registry.
    ///
    /// # Errors
    ///
    /// `NoRuntime` when called outside a tokio runtime.
    pub fn start_with_metrics(
        config: IndexConfig,
        metrics: Arc<MetricsRegistry>,
    ) -> IndexResult<Self> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| IndexError::NoRuntime)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let (applied_tx, applied_rx) = watch::channel(0u64);
        let (state_tx, state_rx) = watch::channel(PipelineState::Running);
        let staged = Arc::new(Mutex::new(StagedSegments::default()));

        runtime.spawn(run_indexer(rx, Arc::clone(&staged), applied_tx, state_rx));

        Ok(Self {
            config,
            writer: Mutex::new(WriteQueue { last_seq: 0, tx }),
            applied: applied_rx,
            state: state_tx,
            staged,
            visible: RwLock::new(Arc::new(IndexSnapshot::default())),
            sources: Mutex::new(()),
            metrics,
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Serializes writers that read vote counts from the source of truth
    /// and then import them.
    ///
    /// Holding the guard across the read and the import means imports are
    /// sequenced in the order their counts were read, so an older read can
    /// never overwrite a newer one.
    pub fn source_guard(&self) -> IndexResult<MutexGuard<'_, ()>> {
        self.sources
            .lock()
            .map_err(|_| IndexError::LockPoisoned("sources"))
    }

    /// Accepts an insert-or-replace of `entry.post_id` within
    /// `entry.campaign_id`. Returns the write's sequence number.
    ///
    /// Non-blocking. The write is not visible to queries until a later
    /// `refresh` completes.
    pub fn upsert(&self, entry: RankEntry) -> IndexResult<u64> {
        let seq = {
            let mut writer = self
                .writer
                .lock()
                .map_err(|_| IndexError::LockPoisoned("writer"))?;
            let seq = writer.last_seq + 1;
            writer
                .tx
                .send(PendingWrite { seq, entry })
                .map_err(|_| IndexError::PipelineClosed)?;
            writer.last_seq = seq;
            seq
        };

        self.metrics.add_upserts_accepted(1);
        tracing::debug!(
            event = %Event::UpsertAccepted,
            campaign_id = %entry.campaign_id,
            post_id = %entry.post_id,
            vote_count = entry.vote_count,
            seq,
            "upsert accepted"
        );
        Ok(seq)
    }

    /// Accepts a batch of writes, in iteration order.
    ///
    /// Returns the sequence number of the last write (or of the last write
    /// accepted before, for an empty batch).
    pub fn import<I>(&self, entries: I) -> IndexResult<u64>
    where
        I: IntoIterator<Item = RankEntry>,
    {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| IndexError::LockPoisoned("writer"))?;

        let mut accepted = 0u64;
        for entry in entries {
            let seq = writer.last_seq + 1;
            writer
                .tx
                .send(PendingWrite { seq, entry })
                .map_err(|_| IndexError::PipelineClosed)?;
            writer.last_seq = seq;
            accepted += 1;
        }
        let last_seq = writer.last_seq;
        drop(writer);

        self.metrics.add_upserts_accepted(accepted);
        tracing::debug!(event = %Event::UpsertAccepted, accepted, last_seq, "batch accepted");
        Ok(last_seq)
    }

    /// Waits until every write accepted before this call is applied, then
    /// makes it visible to queries.
    ///
    /// # Errors
    ///
    /// - `RefreshTimeout` when the pipeline does not catch up within
    ///   `IndexConfig::refresh_timeout`. Nothing is lost; retry later.
    /// - `PipelineClosed` when the indexer task is gone.
    pub async fn refresh(&self) -> IndexResult<RefreshStats> {
        let target = self.accepted_seq()?;
        let started = Instant::now();

        let mut applied = self.applied.clone();
        let caught_up = tokio::time::timeout(self.config.refresh_timeout, async move {
            let reached = applied.wait_for(|seq| *seq >= target).await.map(|_| ());
            reached
        })
        .await;

        match caught_up {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return Err(IndexError::PipelineClosed),
            Err(_) => {
                let waited_ms = started.elapsed().as_millis() as u64;
                let pending = target.saturating_sub(*self.applied.borrow());
                self.metrics.increment_refresh_timeouts();
                tracing::warn!(
                    event = %Event::RefreshTimeout,
                    waited_ms,
                    pending,
                    target_seq = target,
                    "refresh timed out"
                );
                return Err(IndexError::RefreshTimeout { waited_ms, pending });
            }
        }

        let stats = self.publish()?;
        self.metrics.increment_refreshes();
        tracing::debug!(
            event = %Event::RefreshComplete,
            generation = stats.generation,
            visible_seq = stats.visible_seq,
            campaigns = stats.campaigns_published,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "refresh complete"
        );
        Ok(stats)
    }

    /// Swaps the staged trees of changed campaigns into a new snapshot.
    ///
    /// The staged lock is held across the swap so that concurrent refreshes
    /// publish in applied order.
    fn publish(&self) -> IndexResult<RefreshStats> {
        let mut staged = self
            .staged
            .lock()
            .map_err(|_| IndexError::LockPoisoned("staged"))?;
        let applied_seq = staged.applied_seq();
        let changed = staged.take_dirty();

        let mut visible = self
            .visible
            .write()
            .map_err(|_| IndexError::LockPoisoned("visible"))?;

        if changed.is_empty() {
            return Ok(RefreshStats {
                generation: visible.generation,
                visible_seq: visible.visible_seq,
                campaigns_published: 0,
            });
        }

        let campaigns_published = changed.len();
        let mut campaigns = visible.campaigns.clone();
        for (campaign_id, tree) in changed {
            campaigns.insert(campaign_id, Arc::new(tree));
        }

        let next = IndexSnapshot {
            generation: visible.generation + 1,
            visible_seq: applied_seq,
            campaigns,
        };
        let stats = RefreshStats {
            generation: next.generation,
            visible_seq: next.visible_seq,
            campaigns_published,
        };
        *visible = Arc::new(next);
        drop(visible);
        drop(staged);

        Ok(stats)
    }

    /// Ranked entries of a campaign as of the last completed refresh.
    ///
    /// A campaign with nothing indexed yields an empty result.
    pub fn query(&self, query: &RankQuery) -> IndexResult<Vec<RankEntry>> {
        let snapshot = self.snapshot()?;

        let hits: Vec<RankEntry> = match snapshot.campaigns.get(&query.campaign_id) {
            Some(tree) => {
                let ranked = tree.ranked(query.min_votes).copied();
                match query.limit {
                    Some(limit) => ranked.take(limit).collect(),
                    None => ranked.collect(),
                }
            }
            None => Vec::new(),
        };

        tracing::trace!(
            event = %Event::QueryExecuted,
            campaign_id = %query.campaign_id,
            min_votes = query.min_votes,
            generation = snapshot.generation,
            hits = hits.len(),
            "index query"
        );
        Ok(hits)
    }

    /// Stops applying writes. Accepted writes queue up and `refresh` times
    /// out until `resume` is called.
    pub fn suspend(&self) {
        self.state.send_replace(PipelineState::Suspended);
        tracing::info!(event = %Event::IndexSuspended, "indexing suspended");
    }

    /// Restarts a suspended pipeline.
    pub fn resume(&self) {
        self.state.send_replace(PipelineState::Running);
        tracing::info!(event = %Event::IndexResumed, "indexing resumed");
    }

    pub fn is_suspended(&self) -> bool {
        *self.state.borrow() == PipelineState::Suspended
    }

    pub fn stats(&self) -> IndexResult<IndexStats> {
        let accepted_seq = self.accepted_seq()?;
        let applied_seq = *self.applied.borrow();
        let snapshot = self.snapshot()?;

        Ok(IndexStats {
            accepted_seq,
            applied_seq,
            visible_seq: snapshot.visible_seq,
            pending: accepted_seq.saturating_sub(snapshot.visible_seq),
            generation: snapshot.generation,
            campaigns: snapshot.campaigns.len(),
            suspended: self.is_suspended(),
        })
    }

    fn accepted_seq(&self) -> IndexResult<u64> {
        self.writer
            .lock()
            .map(|writer| writer.last_seq)
            .map_err(|_| IndexError::LockPoisoned("writer"))
    }

    fn snapshot(&self) -> IndexResult<Arc<IndexSnapshot>> {
        self.visible
            .read()
            .map(|snapshot| Arc::clone(&snapshot))
            .map_err(|_| IndexError::LockPoisoned("visible"))
    }
}
