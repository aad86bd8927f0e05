//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Registry of operational counters.
///
/// Counters use Relaxed ordering; readers only need eventually exact totals.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    campaigns_created: AtomicU64,
    campaigns_rejected: AtomicU64,
    votes_recorded: AtomicU64,
    upserts_accepted: AtomicU64,
    refreshes_completed: AtomicU64,
    refresh_timeouts: AtomicU64,
    queries_executed: AtomicU64,
    queries_rejected: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_campaigns_created(&self) {
        self.campaigns_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_campaigns_rejected(&self) {
        self.campaigns_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_votes_recorded(&self) {
        self.votes_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_upserts_accepted(&self, count: u64) {
        self.upserts_accepted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_refreshes(&self) {
        self.refreshes_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_refresh_timeouts(&self) {
        self.refresh_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            campaigns_created: self.campaigns_created.load(Ordering::Relaxed),
            campaigns_rejected: self.campaigns_rejected.load(Ordering::Relaxed),
            votes_recorded: self.votes_recorded.load(Ordering::Relaxed),
            upserts_accepted: self.upserts_accepted.load(Ordering::Relaxed),
            refreshes_completed: self.refreshes_completed.load(Ordering::Relaxed),
            refresh_timeouts: self.refresh_timeouts.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub campaigns_created: u64,
    pub campaigns_rejected: u64,
    pub votes_recorded: u64,
    pub upserts_accepted: u64,
    pub refreshes_completed: u64,
    pub refresh_timeouts: u64,
    pub queries_executed: u64,
    pub queries_rejected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_registry_has_zero_values() {
        let registry = MetricsRegistry::new();
        assert_eq!(registry.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.add_upserts_accepted(3);
        registry.increment_refreshes();
        registry.increment_refresh_timeouts();
        registry.increment_queries_executed();
        registry.increment_queries_executed();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.upserts_accepted, 3);
        assert_eq!(snapshot.refreshes_completed, 1);
        assert_eq!(snapshot.refresh_timeouts, 1);
        assert_eq!(snapshot.queries_executed, 2);
        assert_eq!(snapshot.queries_rejected, 0);
    }

    #[test]
    fn test_concurrent_increments() {
        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let r = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    r.increment_votes_recorded();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(registry.snapshot().votes_recorded, 1000);
    }
}
