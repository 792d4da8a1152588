//! Session-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use saythanks_core::error::CoreError;
use saythanks_core::types::DbId;
use saythanks_db::repositories::SessionRepo;
use serde::Serialize;

use crate::auth::cookie::{read_cookie, SESSION_COOKIE};
use crate::auth::session::{hash_token_id, validate_token};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated user extracted from the session token.
///
/// The token is read from the `saythanks_session` cookie, or from an
/// `Authorization: Bearer <token>` header when no cookie is present. A valid
/// signature is not enough: the token's session row must still be active.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(auth_id = %user.auth_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    /// Identity-provider subject (from `claims.sub`).
    pub auth_id: String,
    pub nickname: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    /// The backing `user_sessions` row.
    #[serde(skip_serializing)]
    pub session_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        let claims = validate_token(&token, &state.config.session).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

        let session =
            SessionRepo::find_active_by_token_hash(&state.pool, &hash_token_id(&claims.jti))
                .await?
                .filter(|s| s.auth_id == claims.sub)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Unauthorized("Session has ended".into()))
                })?;

        Ok(AuthUser {
            auth_id: claims.sub,
            nickname: claims.nickname,
            name: claims.name,
            email: claims.email,
            picture: claims.picture,
            session_id: session.id,
        })
    }
}

fn extract_token(parts: &Parts) -> AppResult<String> {
    if let Some(token) = read_cookie(&parts.headers, SESSION_COOKIE) {
        return Ok(token);
    }

    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Login required".into())))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })
}
