//! Session token cache with sliding TTL expiry.
//!
//! Maps opaque [`SessionToken`]s to authenticated principal records so a
//! request can be serviced without going back to the credential store:
//! - every successful lookup resets the entry's expiry clock
//! - entries idle for longer than the TTL are evicted on lookup
//! - an optional background sweeper reclaims abandoned sessions
//! - an optional capacity bound evicts the least recently used token
//!
//! # Example
//!
//! ```rust,ignore
//! use mbm_session::{CacheConfig, SessionTokenCache};
//!
//! let cache = SessionTokenCache::new(
//!     CacheConfig::new().with_ttl(Duration::from_secs(1800)),
//! );
//! cache.put(token, user)?;
//! let user = cache.get_by_session_token(Some(&token));
//! ```
//!
//! [`SessionToken`]: mbm_types::SessionToken

mod cache;
mod config;
mod entry;
mod error;
mod sweeper;

pub use cache::{CacheStats, SessionTokenCache};
pub use config::CacheConfig;
pub use entry::CacheEntry;
pub use error::{Error, Result};
pub use sweeper::SweeperHandle;
