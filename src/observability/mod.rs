//! Observability subsystem
//!
//! - Structured logging through `tracing`, one `event` field per line
//! - Counter metrics
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on ranking results
//! 3. Logging failures never fail an operation
//!
//! # Usage
//!
//! ```ignore
//! use campaignrank::observability::{Event, MetricsRegistry};
//!
//! tracing::info!(event = %Event::QueryExecuted, campaign_id = 2, hits = 3, "query complete");
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_queries_executed();
//! ```

mod events;
mod metrics;

pub use events::Event;
pub use metrics::{MetricsRegistry, MetricsSnapshot};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Logs go to stderr so that
/// stdout stays reserved for command responses. Installing twice is a no-op.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging("warn");
        init_logging("debug");
        tracing::info!(event = %Event::ConfigLoaded, "still logging");
    }
}
