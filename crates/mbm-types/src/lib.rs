//! Shared types for the MBM session-token cache.
//!
//! - [`SessionToken`]: the opaque key handed to clients after authentication
//! - [`ClientUser`]: the principal record cached against a token
//! - [`TtlUnit`]: time units used when configuring expiry
//! - configuration capability traits for decoupled config passing

pub mod config;
pub mod token;
pub mod user;

pub use config::{
    ConfigProvider, HasSessionCacheConfig, SessionCacheConfigProvider, TtlUnit,
    defaults as config_defaults,
};
pub use token::{SessionToken, TokenParseError};
pub use user::{Authority, ClientUser};
