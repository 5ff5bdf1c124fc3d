//! Authenticated principal records.

use serde::{Deserialize, Serialize};

use crate::SessionToken;

/// Role granted to a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authority {
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(rename = "ROLE_CUSTOMER")]
    Customer,
    #[serde(rename = "ROLE_PUBLIC")]
    Public,
    #[serde(rename = "ROLE_STAFF")]
    Staff,
    #[serde(rename = "ROLE_SUPPLIER")]
    Supplier,
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Authority::Admin => "ROLE_ADMIN",
            Authority::Customer => "ROLE_CUSTOMER",
            Authority::Public => "ROLE_PUBLIC",
            Authority::Staff => "ROLE_STAFF",
            Authority::Supplier => "ROLE_SUPPLIER",
        };
        f.write_str(name)
    }
}

/// The principal data needed to service a request without going back to
/// the credential store.
///
/// The session cache treats this as an opaque value: it stores what it is
/// given and hands back clones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientUser {
    pub username: String,
    pub password_digest: String,
    pub api_key: String,
    pub secret_key: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_token: Option<SessionToken>,
    #[serde(default)]
    pub cached_authorities: Vec<Authority>,
}

impl ClientUser {
    /// Create a user with the given username and no credentials.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn with_password_digest(mut self, digest: impl Into<String>) -> Self {
        self.password_digest = digest.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = secret_key.into();
        self
    }

    pub fn with_session_token(mut self, token: SessionToken) -> Self {
        self.session_token = Some(token);
        self
    }

    pub fn with_authorities(mut self, authorities: impl IntoIterator<Item = Authority>) -> Self {
        self.cached_authorities = authorities.into_iter().collect();
        self
    }

    /// Check whether the user holds the given authority.
    pub fn has_authority(&self, authority: Authority) -> bool {
        self.cached_authorities.contains(&authority)
    }
}
