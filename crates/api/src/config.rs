use saythanks_core::links;

use crate::auth::auth0::Auth0Config;
use crate::auth::session::SessionConfig;

/// Output format of the tracing `fmt` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All non-secret fields have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public base URL of the site (no trailing slash). Login redirects and
    /// share links are built from it, see [`saythanks_core::links`].
    pub app_base_url: String,
    /// Log line format (default: text).
    pub log_format: LogFormat,
    /// Sentry DSN; error reporting is off when unset.
    pub sentry_dsn: Option<String>,
    /// Session token and cookie settings.
    pub session: SessionConfig,
    /// Auth0 OAuth client settings.
    pub auth0: Auth0Config,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `DATABASE_URL`         | required                   |
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `APP_BASE_URL`         | `http://localhost:5173`    |
    /// | `LOG_FORMAT`           | `text`                     |
    /// | `SENTRY_DSN`           | unset                      |
    ///
    /// See [`SessionConfig::from_env`] and [`Auth0Config::from_env`] for the
    /// required secrets.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_base_url = std::env::var("APP_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let log_format = std::env::var("LOG_FORMAT")
            .ok()
            .map(|raw| parse_log_format(&raw).expect("LOG_FORMAT must be `text` or `json`"))
            .unwrap_or_default();

        let sentry_dsn = parse_optional(std::env::var("SENTRY_DSN").ok());

        Self {
            database_url,
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_base_url,
            log_format,
            sentry_dsn,
            session: SessionConfig::from_env(),
            auth0: Auth0Config::from_env(),
        }
    }

    /// Public URL at which an inbox accepts notes.
    pub fn inbox_share_url(&self, slug: &str) -> String {
        links::inbox_share_url(&self.app_base_url, slug)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_log_format(raw: &str) -> Option<LogFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "text" | "pretty" => Some(LogFormat::Text),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

/// Blank values count as unset.
fn parse_optional(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
