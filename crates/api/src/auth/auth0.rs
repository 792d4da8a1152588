//! Auth0 authorization-code flow.
//!
//! Completing a login takes three sequential calls, with no retry:
//!
//! 1. `POST /oauth/token` exchanges the code for an access token.
//! 2. `GET /userinfo` returns the subject, e-mail, name and picture.
//! 3. `GET /api/v2/users/{sub}` (management API) returns the nickname.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::identity::{IdentityError, IdentityProvider, UserProfile};

/// HTTP timeout for a single call to Auth0.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Scopes requested at login.
const LOGIN_SCOPE: &str = "openid profile email";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Configuration for the Auth0 application.
#[derive(Debug, Clone)]
pub struct Auth0Config {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI registered with Auth0; points at `/callback`.
    pub callback_url: String,
    /// Tenant domain, e.g. `saythanks.auth0.com`.
    pub domain: String,
    /// Management API token used to read user details.
    pub management_token: String,
}

impl Auth0Config {
    /// Load Auth0 configuration from environment variables.
    ///
    /// | Env Var               | Required |
    /// |-----------------------|----------|
    /// | `AUTH0_CLIENT_ID`     | **yes**  |
    /// | `AUTH0_CLIENT_SECRET` | **yes**  |
    /// | `AUTH0_CALLBACK_URL`  | **yes**  |
    /// | `AUTH0_DOMAIN`        | **yes**  |
    /// | `AUTH0_JWT_V2_TOKEN`  | **yes**  |
    ///
    /// # Panics
    ///
    /// Panics if any variable is missing.
    pub fn from_env() -> Self {
        let required = |name: &str| {
            std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set in the environment"))
        };
        Self {
            client_id: required("AUTH0_CLIENT_ID"),
            client_secret: required("AUTH0_CLIENT_SECRET"),
            callback_url: required("AUTH0_CALLBACK_URL"),
            domain: required("AUTH0_DOMAIN"),
            management_token: required("AUTH0_JWT_V2_TOKEN"),
        }
    }

    /// `https://{domain}/`.
    pub fn base_url(&self) -> String {
        format!("https://{}/", self.domain.trim_end_matches('/'))
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    nickname: Option<String>,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserDetail {
    nickname: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for a single Auth0 tenant.
pub struct Auth0Client {
    client: reqwest::Client,
    base_url: Url,
    config: Auth0Config,
}

impl Auth0Client {
    /// Build a client for the configured tenant.
    pub fn new(config: Auth0Config) -> Result<Self, IdentityError> {
        let base_url =
            Url::parse(&config.base_url()).map_err(|e| IdentityError::Config(e.to_string()))?;
        Self::with_base_url(config, base_url)
    }

    /// Build a client that talks to `base_url` instead of the tenant domain.
    pub fn with_base_url(config: Auth0Config, base_url: Url) -> Result<Self, IdentityError> {
        if base_url.cannot_be_a_base() {
            return Err(IdentityError::Config(format!(
                "'{base_url}' cannot be used as a base URL"
            )));
        }
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Resolve path segments against the tenant base URL, percent-encoding
    /// each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Step 1: trade the authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, IdentityError> {
        let payload = serde_json::json!({
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "redirect_uri": self.config.callback_url,
            "code": code,
            "grant_type": "authorization_code",
        });

        let response = self
            .client
            .post(self.endpoint(&["oauth", "token"]))
            .json(&payload)
            .send()
            .await?;

        let token: TokenResponse = Self::parse_response(response).await?;
        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(IdentityError::MissingField("access_token"))
    }

    /// Step 2: read the OpenID profile of the token's owner.
    async fn fetch_userinfo(&self, access_token: &str) -> Result<UserInfo, IdentityError> {
        let response = self
            .client
            .get(self.endpoint(&["userinfo"]))
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Step 3: read the user's record from the management API.
    async fn fetch_user_detail(&self, sub: &str) -> Result<UserDetail, IdentityError> {
        let response = self
            .client
            .get(self.endpoint(&["api", "v2", "users", sub]))
            .bearer_auth(&self.config.management_token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, IdentityError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl IdentityProvider for Auth0Client {
    fn authorize_url(&self, state: &str) -> String {
        let mut url = self.endpoint(&["authorize"]);
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.callback_url)
            .append_pair("scope", LOGIN_SCOPE)
            .append_pair("state", state);
        url.into()
    }

    async fn authenticate(&self, code: &str) -> Result<UserProfile, IdentityError> {
        let access_token = self.exchange_code(code).await?;
        let info = self.fetch_userinfo(&access_token).await?;
        let detail = self.fetch_user_detail(&info.sub).await?;

        let nickname = detail
            .nickname
            .or(info.nickname)
            .filter(|n| !n.trim().is_empty())
            .ok_or(IdentityError::MissingField("nickname"))?;

        tracing::debug!(sub = %info.sub, nickname = %nickname, "Identity provider login resolved");

        Ok(UserProfile {
            sub: info.sub,
            nickname,
            name: info.name,
            email: info.email,
            picture: info.picture,
        })
    }
}
