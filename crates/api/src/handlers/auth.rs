//! Handlers for the OAuth login flow and the session profile.

use axum::extract::{Query, State};
use axum::http::header::{SET_COOKIE, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Redirect};
use axum::Json;
use chrono::Utc;
use saythanks_core::error::CoreError;
use saythanks_core::links;
use saythanks_core::slug::derive_slug;
use saythanks_db::models::inbox::Inbox;
use saythanks_db::models::session::CreateSession;
use saythanks_db::repositories::{InboxRepo, SessionRepo};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::cookie::{
    build_cookie, clear_cookie, read_cookie, SESSION_COOKIE, STATE_COOKIE,
    STATE_COOKIE_MAX_AGE_SECS,
};
use crate::auth::identity::UserProfile;
use crate::auth::session::{generate_session_token, hash_token_id};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Base slug used when a nickname yields no usable characters.
const FALLBACK_SLUG: &str = "thanks";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters Auth0 appends to the callback URL.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Data the front-end needs to offer a login button.
#[derive(Debug, Serialize)]
pub struct LoginBootstrap {
    /// Relative URL that starts the OAuth flow.
    pub login_url: &'static str,
    pub client_id: String,
    pub domain: String,
    pub callback_url: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /auth/login
///
/// Start the OAuth flow: remember a random `state` in a short-lived cookie
/// and send the browser to the identity provider.
pub async fn login(State(state): State<AppState>) -> impl IntoResponse {
    let oauth_state = Uuid::new_v4().simple().to_string();
    let cookie = build_cookie(
        STATE_COOKIE,
        &oauth_state,
        STATE_COOKIE_MAX_AGE_SECS,
        state.config.session.cookie_secure,
    );
    let url = state.identity.authorize_url(&oauth_state);

    ([(SET_COOKIE, cookie)], Redirect::to(&url))
}

/// GET /callback?code=&state=
///
/// Complete the OAuth flow: exchange the code for a profile, make sure the
/// user has an inbox, open a session and redirect to the dashboard.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(error) = params.error {
        tracing::warn!(
            error = %error,
            description = params.error_description.as_deref().unwrap_or(""),
            "Identity provider returned an error to the callback"
        );
        return Err(AppError::BadRequest(format!("Login failed: {error}")));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".into()))?;

    let expected_state = read_cookie(&headers, STATE_COOKIE);
    if expected_state.is_none() || params.state != expected_state {
        return Err(AppError::BadRequest("OAuth state mismatch".into()));
    }

    // 1. Exchange the code for the user's profile.
    let profile = state.identity.authenticate(&code).await?;

    // 2. Create the inbox on first login, otherwise refresh its e-mail.
    let inbox = ensure_inbox(&state, &profile).await?;

    // 3. Issue a session token backed by a session row.
    let (token, claims) = generate_session_token(&profile, &state.config.session)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            auth_id: profile.sub.clone(),
            token_hash: hash_token_id(&claims.jti),
            expires_at: Utc::now() + chrono::Duration::hours(state.config.session.expiry_hours),
            user_agent,
        },
    )
    .await?;

    tracing::info!(slug = %inbox.slug, session_id = session.id, "User logged in");

    let secure = state.config.session.cookie_secure;
    let cookies = AppendHeaders([
        (
            SET_COOKIE,
            build_cookie(
                SESSION_COOKIE,
                &token,
                state.config.session.expiry_secs(),
                secure,
            ),
        ),
        (SET_COOKIE, clear_cookie(STATE_COOKIE, secure)),
    ]);

    let dashboard = links::dashboard_url(&state.config.app_base_url);
    Ok((cookies, Redirect::to(&dashboard)))
}

/// POST /auth/logout
///
/// Revoke the current session and clear the session cookie. Returns 204.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    SessionRepo::revoke(&state.pool, auth.session_id).await?;
    tracing::info!(auth_id = %auth.auth_id, "User logged out");

    let cookie = clear_cookie(SESSION_COOKIE, state.config.session.cookie_secure);
    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]))
}

/// GET /api/v1/index
pub async fn index(State(state): State<AppState>) -> Json<DataResponse<LoginBootstrap>> {
    Json(DataResponse {
        data: login_bootstrap(&state),
    })
}

/// GET /api/v1/thanks
///
/// Shown after a note was submitted; carries the same login data as the
/// index so visitors can create an inbox of their own.
pub async fn thanks(State(state): State<AppState>) -> Json<DataResponse<LoginBootstrap>> {
    Json(DataResponse {
        data: login_bootstrap(&state),
    })
}

/// GET /api/v1/me
pub async fn me(auth: AuthUser) -> Json<DataResponse<AuthUser>> {
    Json(DataResponse { data: auth })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn login_bootstrap(state: &AppState) -> LoginBootstrap {
    let auth0 = &state.config.auth0;
    LoginBootstrap {
        login_url: "/auth/login",
        client_id: auth0.client_id.clone(),
        domain: auth0.domain.clone(),
        callback_url: auth0.callback_url.clone(),
    }
}

/// Find the user's inbox, creating it with a slug derived from the
/// nickname on first login.
async fn ensure_inbox(state: &AppState, profile: &UserProfile) -> AppResult<Inbox> {
    if let Some(inbox) =
        InboxRepo::update_email(&state.pool, &profile.sub, profile.email.as_deref()).await?
    {
        return Ok(inbox);
    }

    let base = derive_slug(&profile.nickname).unwrap_or_else(|_| FALLBACK_SLUG.to_string());
    let inbox = InboxRepo::create_with_available_slug(
        &state.pool,
        &base,
        &profile.sub,
        profile.email.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(format!(
            "No free inbox slug available for '{base}'"
        )))
    })?;

    tracing::info!(slug = %inbox.slug, "Inbox created");
    Ok(inbox)
}
