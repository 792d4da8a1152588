//! Cookie helpers for the session and OAuth `state` cookies.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Cookie holding the signed session token.
pub const SESSION_COOKIE: &str = "saythanks_session";

/// Cookie holding the OAuth `state` between `/auth/login` and `/callback`.
pub const STATE_COOKIE: &str = "saythanks_oauth_state";

/// Lifetime of the OAuth `state` cookie in seconds.
pub const STATE_COOKIE_MAX_AGE_SECS: i64 = 600;

/// Read a cookie value from all `Cookie` headers of a request.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Build a `Set-Cookie` value for an `HttpOnly`, `SameSite=Lax` cookie
/// scoped to the whole site.
pub fn build_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}{secure}")
}

/// Build a `Set-Cookie` value that removes the named cookie.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    build_cookie(name, "", 0, secure)
}
