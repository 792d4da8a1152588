//! Signed session tokens.
//!
//! A session token is an HS256-signed JWT carrying the user's profile. The
//! token's `jti` is hashed with SHA-256 and stored in `user_sessions`, so a
//! session can be revoked server-side and a database leak does not expose
//! usable tokens.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::identity::UserProfile;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the identity provider's user id.
    pub sub: String,
    pub nickname: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4); its hash keys the session row.
    pub jti: String,
}

/// Configuration for session tokens and the session cookie.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session lifetime in hours (default: 168, one week).
    pub expiry_hours: i64,
    /// Whether cookies carry the `Secure` attribute (default: false).
    pub cookie_secure: bool,
}

/// Default session lifetime in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 168;

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `APP_SECRET`            | **yes**  | --      |
    /// | `SESSION_EXPIRY_HOURS`  | no       | `168`   |
    /// | `SESSION_COOKIE_SECURE` | no       | `false` |
    ///
    /// # Panics
    ///
    /// Panics if `APP_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("APP_SECRET").expect("APP_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "APP_SECRET must not be empty");

        let expiry_hours: i64 = std::env::var("SESSION_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_HOURS.to_string())
            .parse()
            .expect("SESSION_EXPIRY_HOURS must be a valid i64");

        let cookie_secure: bool = std::env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SESSION_COOKIE_SECURE must be true or false");

        Self {
            secret,
            expiry_hours,
            cookie_secure,
        }
    }

    /// Session lifetime in seconds, for cookie `Max-Age`.
    pub fn expiry_secs(&self) -> i64 {
        self.expiry_hours * 3600
    }
}

/// Generate a session token for the given profile.
///
/// Returns the encoded token together with its claims; callers persist
/// [`hash_token_id`] of `claims.jti`.
pub fn generate_session_token(
    profile: &UserProfile,
    config: &SessionConfig,
) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: profile.sub.clone(),
        nickname: profile.nickname.clone(),
        name: profile.name.clone(),
        email: profile.email.clone(),
        picture: profile.picture.clone(),
        exp: now + config.expiry_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, claims))
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &SessionConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Compute the SHA-256 hex digest of a token id.
pub fn hash_token_id(jti: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(jti.as_bytes());
    format!("{:x}", hasher.finalize())
}
