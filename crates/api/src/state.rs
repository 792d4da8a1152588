use std::sync::Arc;

use saythanks_notify::EmailDelivery;

use crate::auth::identity::IdentityProvider;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: saythanks_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// OAuth identity provider used by the login flow.
    pub identity: Arc<dyn IdentityProvider>,
    /// New-note mailer; `None` when SMTP is not configured.
    pub mailer: Option<Arc<EmailDelivery>>,
}
