//! Configuration for the session token cache.

use std::num::NonZeroUsize;
use std::time::Duration;

use mbm_types::{HasSessionCacheConfig, config_defaults};

/// Configuration for the session token cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Sliding time-to-live.
    /// Entries that haven't been read within this duration are evicted.
    pub ttl: Duration,

    /// Maximum number of cached tokens before the least recently used one
    /// is evicted. `None` leaves the cache unbounded.
    pub max_entries: Option<NonZeroUsize>,

    /// Interval for the background sweeper.
    /// If `None`, expired entries are only removed on lookup.
    pub sweep_interval: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: config_defaults::ttl(),
            max_entries: None,
            sweep_interval: Some(config_defaults::sweep_interval()),
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any configuration provider.
    pub fn from_provider<C: HasSessionCacheConfig>(provider: &C) -> Self {
        Self {
            ttl: provider.ttl(),
            max_entries: provider.max_entries().and_then(NonZeroUsize::new),
            sweep_interval: provider.sweep_interval(),
        }
    }

    /// Set the sliding TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Bound the number of cached tokens. A bound of zero leaves the cache
    /// unbounded.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = NonZeroUsize::new(max);
        self
    }

    /// Remove the capacity bound.
    pub fn without_max_entries(mut self) -> Self {
        self.max_entries = None;
        self
    }

    /// Set the background sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Disable background sweeping (lazy eviction only).
    pub fn without_sweep(mut self) -> Self {
        self.sweep_interval = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbm_types::SessionCacheConfigProvider;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = CacheConfig::new()
            .with_ttl(Duration::from_millis(100))
            .with_max_entries(10)
            .without_sweep();

        assert_eq!(config.ttl, Duration::from_millis(100));
        assert_eq!(config.max_entries, NonZeroUsize::new(10));
        assert_eq!(config.sweep_interval, None);
    }

    #[test]
    fn test_from_provider() {
        let provider = SessionCacheConfigProvider {
            ttl: Duration::from_secs(5),
            max_entries: Some(42),
            sweep_interval: Some(Duration::from_secs(1)),
        };
        let config = CacheConfig::from_provider(&provider);
        assert_eq!(config.ttl, Duration::from_secs(5));
        assert_eq!(config.max_entries, NonZeroUsize::new(42));
        assert_eq!(config.sweep_interval, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_zero_max_entries_is_unbounded() {
        let config = CacheConfig::new().with_max_entries(10).with_max_entries(0);
        assert_eq!(config.max_entries, None);

        let provider = SessionCacheConfigProvider {
            ttl: Duration::from_secs(5),
            max_entries: Some(0),
            sweep_interval: None,
        };
        assert_eq!(CacheConfig::from_provider(&provider).max_entries, None);
    }
}
