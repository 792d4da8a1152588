//! Identity-provider abstraction used by the OAuth login flow.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The logged-in user as reported by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Provider subject identifier, e.g. `auth0|5f1c...`.
    pub sub: String,
    /// Provider nickname; the inbox slug is derived from it.
    pub nickname: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
}

/// Errors raised while talking to the identity provider.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Identity provider error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A field required to complete the login was absent from a response.
    #[error("Identity provider response missing field: {0}")]
    MissingField(&'static str),

    /// The client could not be constructed from its configuration.
    #[error("Identity provider misconfigured: {0}")]
    Config(String),
}

/// An OAuth2 authorization-code identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to in order to log in, carrying `state`.
    fn authorize_url(&self, state: &str) -> String;

    /// Exchange an authorization code for the user's profile.
    async fn authenticate(&self, code: &str) -> Result<UserProfile, IdentityError>;
}
