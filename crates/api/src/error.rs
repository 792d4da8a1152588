use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use saythanks_core::error::CoreError;
use serde_json::json;

use crate::auth::identity::IdentityError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{ "error": ..., "code": ... }`
/// JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `saythanks_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The identity provider failed during login.
    #[error("Identity provider error: {0}")]
    Identity(#[from] IdentityError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, machine-readable code and client-facing message of an error.
type ErrorParts = (StatusCode, &'static str, String);

impl AppError {
    fn parts(&self) -> ErrorParts {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Identity(err) => {
                tracing::error!(error = %err, "Identity provider request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "Login could not be completed with the identity provider".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

fn core_parts(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
    }
}

/// Sanitized 500; the cause is logged by the caller.
fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (SQLSTATE `23505`) on `uq_*` constraints map to 409.
/// - Everything else maps to a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }

    let unique_constraint = err
        .as_database_error()
        .filter(|db_err| db_err.code().as_deref() == Some("23505"))
        .and_then(|db_err| db_err.constraint())
        .filter(|constraint| constraint.starts_with("uq_"));

    match unique_constraint {
        Some(constraint) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        None => {
            tracing::error!(error = %err, "Database error");
            internal()
        }
    }
}
