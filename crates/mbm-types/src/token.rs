//! Session token type.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when a string is not a valid session token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid session token: {0}")]
pub struct TokenParseError(String);

/// Opaque session token issued after a successful authentication.
///
/// Wraps a random 128-bit UUID. The nil UUID stands for "no token" and is
/// never a valid cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// Generate a new random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The nil token (all zero bits).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Whether this is the nil token.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionToken {
    type Err = TokenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| TokenParseError(e.to_string()))
    }
}

impl From<Uuid> for SessionToken {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
