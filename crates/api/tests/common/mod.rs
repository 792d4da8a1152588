use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use saythanks_api::auth::auth0::Auth0Config;
use saythanks_api::auth::cookie::{SESSION_COOKIE, STATE_COOKIE};
use saythanks_api::auth::identity::{IdentityError, IdentityProvider, UserProfile};
use saythanks_api::auth::session::SessionConfig;
use saythanks_api::config::{LogFormat, ServerConfig};
use saythanks_api::routes;
use saythanks_api::state::AppState;
use saythanks_notify::EmailDelivery;

/// Authorization code that makes [`FakeIdentity`] fail like an upstream outage.
pub const FAILING_CODE: &str = "upstream-down";

/// Identity provider stand-in.
///
/// The authorization code encodes the user: `alice` logs in as
/// `auth0|alice` with nickname `alice`; `alice~7` logs in as `auth0|7`
/// with nickname `alice`.
pub struct FakeIdentity;

#[async_trait]
impl IdentityProvider for FakeIdentity {
    fn authorize_url(&self, state: &str) -> String {
        format!("https://idp.test/authorize?client_id=test-client&state={state}")
    }

    async fn authenticate(&self, code: &str) -> Result<UserProfile, IdentityError> {
        if code == FAILING_CODE {
            return Err(IdentityError::Api {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        let (nickname, id) = code.split_once('~').unwrap_or((code, code));
        Ok(UserProfile {
            sub: format!("auth0|{id}"),
            nickname: nickname.to_string(),
            name: Some(format!("{nickname} tester")),
            email: Some(format!("{id}@example.com")),
            picture: None,
        })
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: "postgres://unused-in-tests".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_base_url: "http://localhost:5173".to_string(),
        log_format: LogFormat::Text,
        sentry_dsn: None,
        session: SessionConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: 1,
            cookie_secure: false,
        },
        auth0: Auth0Config {
            client_id: "test-client".to_string(),
            client_secret: "test-client-secret".to_string(),
            callback_url: "http://localhost:3000/callback".to_string(),
            domain: "idp.test".to_string(),
            management_token: "test-management-token".to_string(),
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. No mailer is configured.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), None)
}

/// Like [`build_test_app`], with an explicit config and optional mailer.
pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    mailer: Option<Arc<EmailDelivery>>,
) -> Router {
    let request_timeout = Duration::from_secs(config.request_timeout_secs);
    let state = AppState {
        pool,
        config: Arc::new(config),
        identity: Arc::new(FakeIdentity),
        mailer,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .merge(routes::auth::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request with an optional `Cookie` header and optional JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    json: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match json {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::GET, uri, Some(cookie), None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(json)).await
}

pub async fn post_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::POST, uri, Some(cookie), None).await
}

pub async fn patch_with_cookie(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::PATCH, uri, Some(cookie), None).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Value of the named cookie in the response's `Set-Cookie` headers.
pub fn set_cookie_value(response: &Response, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix(&prefix))
        .map(|rest| rest.split(';').next().unwrap_or_default().to_string())
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Start the OAuth flow and return the `state` the server issued.
pub async fn start_login(app: &Router) -> String {
    let response = get(app.clone(), "/auth/login").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    set_cookie_value(&response, STATE_COOKIE).expect("login must set the state cookie")
}

/// Complete a login with the given authorization code and return a
/// `Cookie` header value carrying the session.
pub async fn login_as(app: &Router, code: &str) -> String {
    let state = start_login(app).await;
    let uri = format!("/callback?code={code}&state={state}");
    let response = get_with_cookie(app.clone(), &uri, &format!("{STATE_COOKIE}={state}")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let token =
        set_cookie_value(&response, SESSION_COOKIE).expect("callback must set the session cookie");
    format!("{SESSION_COOKIE}={token}")
}

/// Submit a note to an inbox and assert it was accepted.
pub async fn submit(app: &Router, slug: &str, body: &str, byline: &str) {
    let response = post_json(
        app.clone(),
        &format!("/api/v1/to/{slug}/submit"),
        serde_json::json!({ "body": body, "byline": byline }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}
