//! Cache entries and the expiry rule.

use std::time::{Duration, Instant};

/// Entry stored in the cache.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Cached record.
    pub value: V,

    /// When this entry was inserted into the cache.
    pub inserted_at: Instant,

    /// Last successful read (or the insert, if never read).
    last_access: Instant,
}

impl<V> CacheEntry<V> {
    /// Create a new cache entry accessed at `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
            last_access: now,
        }
    }

    /// Time of the last access.
    pub fn last_access(&self) -> Instant {
        self.last_access
    }

    /// Time since the last access.
    pub fn idle(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_access)
    }

    /// Whether the entry has been idle for longer than `ttl`.
    ///
    /// Lookups and sweeps both go through this check.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.idle(now) > ttl
    }

    /// Reset the access clock.
    pub fn touch(&mut self, now: Instant) {
        self.last_access = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_strictly_after_ttl() {
        let start = Instant::now();
        let entry = CacheEntry::new("v", start);
        let ttl = Duration::from_millis(100);

        assert!(!entry.is_expired(ttl, start));
        assert!(!entry.is_expired(ttl, start + ttl));
        assert!(entry.is_expired(ttl, start + ttl + Duration::from_nanos(1)));
    }

    #[test]
    fn test_touch_slides_window() {
        let start = Instant::now();
        let ttl = Duration::from_millis(100);
        let mut entry = CacheEntry::new("v", start);

        entry.touch(start + Duration::from_millis(80));

        assert!(!entry.is_expired(ttl, start + Duration::from_millis(150)));
        assert!(entry.is_expired(ttl, start + Duration::from_millis(181)));
        assert_eq!(entry.inserted_at, start);
    }

    #[test]
    fn test_clock_before_access_is_not_expired() {
        let start = Instant::now();
        let entry = CacheEntry::new("v", start + Duration::from_millis(10));
        assert_eq!(entry.idle(start), Duration::ZERO);
        assert!(!entry.is_expired(Duration::ZERO, start));
    }
}
