//! Session token cache with sliding TTL and optional LRU bound.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use mbm_types::{ClientUser, HasSessionCacheConfig, SessionToken, TtlUnit};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::entry::CacheEntry;
use crate::error::{Error, Result};
use crate::sweeper::{self, SweeperHandle};

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    hits: u64,
    misses: u64,
    expired: u64,
    swept: u64,
    evicted: u64,
}

/// Inner state protected by the mutex.
///
/// Every read or write moves the token to the front of `entries` and stamps
/// it with a clock reading taken under the lock, so recency order is also
/// last-access order.
struct CacheInner<R> {
    entries: LruCache<SessionToken, CacheEntry<R>>,
    ttl: Duration,
    counters: Counters,
}

impl<R> CacheInner<R> {
    /// Pop expired entries from the least recently used end.
    fn sweep_expired(&mut self, now: Instant) -> usize {
        let mut count = 0;
        loop {
            let expired = matches!(
                self.entries.peek_lru(),
                Some((_, entry)) if entry.is_expired(self.ttl, now)
            );
            if !expired {
                break;
            }
            self.entries.pop_lru();
            count += 1;
        }
        self.counters.swept += count as u64;
        count
    }
}

/// Session token cache with sliding TTL.
///
/// This cache provides:
/// - Sliding expiry: each successful lookup restarts the TTL window
/// - Lazy eviction of expired entries on lookup
/// - Optional background sweeping for tokens that are never looked up again
/// - Optional LRU eviction when a capacity bound is configured
/// - Thread-safe access via a single mutex, so each operation is atomic
///
/// Cloning the cache is cheap and shares the same storage; construct one
/// instance at startup and hand clones to whatever needs it.
pub struct SessionTokenCache<R = ClientUser> {
    inner: Arc<Mutex<CacheInner<R>>>,
    max_entries: Option<NonZeroUsize>,
    sweep_interval: Option<Duration>,
}

impl<R: Clone + Send + 'static> SessionTokenCache<R> {
    /// Create a new session token cache.
    pub fn new(config: CacheConfig) -> Self {
        let entries = match config.max_entries {
            Some(max) => LruCache::new(max),
            None => LruCache::unbounded(),
        };

        let inner = CacheInner {
            entries,
            ttl: config.ttl,
            counters: Counters::default(),
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
            max_entries: config.max_entries,
            sweep_interval: config.sweep_interval,
        }
    }

    /// Create a cache from a configuration provider.
    pub fn from_session_config<C: HasSessionCacheConfig>(config: &C) -> Self {
        Self::new(CacheConfig::from_provider(config))
    }

    /// Current configuration, including the TTL installed by the last reset.
    pub fn config(&self) -> CacheConfig {
        CacheConfig {
            ttl: self.ttl(),
            max_entries: self.max_entries,
            sweep_interval: self.sweep_interval,
        }
    }

    /// Current sliding TTL.
    pub fn ttl(&self) -> Duration {
        self.inner.lock().ttl
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Insert or replace the record for `token` and start its TTL window.
    ///
    /// Fails with [`Error::InvalidArgument`] if the token is nil. When the
    /// cache is full, expired entries are reclaimed first and then the least
    /// recently used token is evicted.
    pub fn put(&self, token: SessionToken, record: R) -> Result<()> {
        if token.is_nil() {
            return Err(Error::InvalidArgument(
                "session token must not be nil".to_string(),
            ));
        }

        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = Instant::now();

        let full = inner.entries.len() >= inner.entries.cap().get();
        if full && !inner.entries.contains(&token) {
            inner.sweep_expired(now);
        }

        if let Some((displaced, _)) = inner.entries.push(token, CacheEntry::new(record, now))
            && displaced != token
        {
            inner.counters.evicted += 1;
            debug!(
                cache_size = inner.entries.len(),
                "Evicted least recently used session to make room"
            );
        }

        trace!(cache_size = inner.entries.len(), "Session token cached");
        Ok(())
    }

    /// Look up the record for a session token.
    ///
    /// Returns `None` when no token was supplied, the token is unknown, or
    /// its entry has been idle for longer than the TTL (the entry is removed
    /// in that case). A hit restarts the entry's TTL window and returns a
    /// clone of the record.
    pub fn get_by_session_token(&self, token: Option<&SessionToken>) -> Option<R> {
        let token = token?;

        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let now = Instant::now();

        match inner.entries.get_mut(token) {
            Some(entry) if !entry.is_expired(inner.ttl, now) => {
                entry.touch(now);
                inner.counters.hits += 1;
                trace!("Session token hit");
                return Some(entry.value.clone());
            }
            Some(_) => {}
            None => {
                inner.counters.misses += 1;
                trace!("Session token miss");
                return None;
            }
        }

        inner.entries.pop(token);
        inner.counters.expired += 1;
        inner.counters.misses += 1;
        trace!("Session token expired, removed from cache");
        None
    }

    /// Install a new TTL and discard every entry.
    ///
    /// Meant for startup configuration and test setup. Returns the cache so
    /// calls can be chained.
    pub fn reset(&self, ttl: Duration) -> &Self {
        let mut inner = self.inner.lock();
        let discarded = inner.entries.len();
        inner.entries.clear();
        inner.ttl = ttl;
        inner.counters = Counters::default();

        debug!(?ttl, discarded, "Session token cache reset");

        self
    }

    /// [`reset`](Self::reset) with the TTL given as an amount and a unit.
    pub fn reset_with_unit(&self, amount: u64, unit: TtlUnit) -> &Self {
        self.reset(unit.to_duration(amount))
    }

    /// Remove a token explicitly (e.g. on logout).
    ///
    /// Returns the record if the entry was still live.
    pub fn invalidate(&self, token: &SessionToken) -> Option<R> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let entry = inner.entries.pop(token)?;
        if entry.is_expired(inner.ttl, Instant::now()) {
            inner.counters.expired += 1;
            return None;
        }

        debug!("Session token invalidated");
        Some(entry.value)
    }

    /// Evict every expired entry now.
    ///
    /// Called periodically by the sweeper, but can also be called manually.
    /// Uses the same idle-time rule as lookups, so an entry that a lookup
    /// would still return is never removed.
    pub fn cleanup_expired(&self) -> usize {
        let count = self.inner.lock().sweep_expired(Instant::now());
        if count > 0 {
            debug!(count, "Cleaned up expired sessions");
        }
        count
    }

    /// Spawn the background sweeper at the configured interval.
    ///
    /// Returns `None` when sweeping is disabled. Must be called from within
    /// a tokio runtime.
    pub fn spawn_sweeper(&self) -> Option<SweeperHandle> {
        self.sweep_interval
            .map(|interval| self.spawn_sweeper_every(interval))
    }

    /// Spawn the background sweeper with an explicit interval.
    ///
    /// The sweeper holds only a weak reference and exits once every cache
    /// handle has been dropped.
    pub fn spawn_sweeper_every(&self, interval: Duration) -> SweeperHandle {
        let weak = Arc::downgrade(&self.inner);
        sweeper::spawn(interval, move || {
            let inner = weak.upgrade()?;
            let count = inner.lock().sweep_expired(Instant::now());
            Some(count)
        })
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            size: inner.entries.len(),
            capacity: self.max_entries.map(NonZeroUsize::get),
            ttl: inner.ttl,
            hits: inner.counters.hits,
            misses: inner.counters.misses,
            expired: inner.counters.expired,
            swept: inner.counters.swept,
            evicted: inner.counters.evicted,
        }
    }
}

impl SessionTokenCache<ClientUser> {
    /// Cache a user under its own session token.
    pub fn put_user(&self, user: ClientUser) -> Result<()> {
        let token = user.session_token.ok_or_else(|| {
            Error::InvalidArgument(format!("user '{}' has no session token", user.username))
        })?;
        self.put(token, user)
    }
}

impl<R> Clone for SessionTokenCache<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            max_entries: self.max_entries,
            sweep_interval: self.sweep_interval,
        }
    }
}

impl<R> std::fmt::Debug for SessionTokenCache<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenCache")
            .field("max_entries", &self.max_entries)
            .field("sweep_interval", &self.sweep_interval)
            .finish_non_exhaustive()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of stored entries.
    pub size: usize,

    /// Capacity bound, if any.
    pub capacity: Option<usize>,

    /// Current sliding TTL.
    pub ttl: Duration,

    /// Lookups that returned a record.
    pub hits: u64,

    /// Lookups that returned nothing (unknown or expired).
    pub misses: u64,

    /// Entries removed because a lookup found them expired.
    pub expired: u64,

    /// Entries removed by sweeping.
    pub swept: u64,

    /// Live entries evicted to respect the capacity bound.
    pub evicted: u64,
}
