//! Rank index configuration

use std::time::Duration;

/// Default bound on how long `refresh` waits for the pipeline.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a `RankIndex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Maximum time `refresh` waits for accepted writes to be applied.
    pub refresh_timeout: Duration,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
        }
    }
}

impl IndexConfig {
    /// Create config with the given refresh timeout.
    pub fn with_refresh_timeout(refresh_timeout: Duration) -> Self {
        Self { refresh_timeout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        assert_eq!(IndexConfig::default().refresh_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_custom_timeout() {
        let config = IndexConfig::with_refresh_timeout(Duration::from_millis(50));
        assert_eq!(config.refresh_timeout, Duration::from_millis(50));
    }
}
