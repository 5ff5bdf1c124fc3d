//! Error types for session token cache operations.
//!
//! A lookup miss is not an error: `get_by_session_token` returns `None` and
//! the caller re-authenticates.

/// Error type for session token cache operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required argument was absent (e.g. a nil session token).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for session token cache operations.
pub type Result<T> = std::result::Result<T, Error>;
