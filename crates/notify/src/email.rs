//! New-note email delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send a
//! plain-text mail to an inbox owner whenever a note arrives. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use saythanks_core::links::{dashboard_url, note_share_url};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The SMTP exchange did not finish within the configured timeout.
    #[error("SMTP delivery timed out after {0:?}")]
    Timeout(Duration),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "SayThanks <noreply@saythanks.local>";

/// Default limit on a whole SMTP exchange, in seconds. Kept well below the
/// HTTP request timeout since delivery happens inside the submit request.
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 10;

/// Default public base URL used to build share links.
const DEFAULT_BASE_URL: &str = "http://localhost:5173";

/// Subject line of every new-note mail.
pub const NOTE_SUBJECT: &str = "You've received a note of thanks!";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
    /// Upper bound on connecting to the server and sending one message.
    pub timeout: Duration,
    /// Public base URL of the site, without trailing slash.
    pub base_url: String,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable            | Required | Default                               |
    /// |---------------------|----------|---------------------------------------|
    /// | `SMTP_HOST`         | yes      | --                                    |
    /// | `SMTP_PORT`         | no       | `587`                                 |
    /// | `SMTP_FROM`         | no       | `SayThanks <noreply@saythanks.local>` |
    /// | `SMTP_USER`         | no       | --                                    |
    /// | `SMTP_PASSWORD`     | no       | --                                    |
    /// | `SMTP_TIMEOUT_SECS` | no       | `10`                                  |
    /// | `APP_BASE_URL`      | no       | `http://localhost:5173`               |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            timeout: Duration::from_secs(
                std::env::var("SMTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(DEFAULT_SMTP_TIMEOUT_SECS),
            ),
            base_url: std::env::var("APP_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// NoteEmail
// ---------------------------------------------------------------------------

/// The parts of a freshly submitted note that go into the notification.
#[derive(Debug, Clone)]
pub struct NoteEmail<'a> {
    pub uuid: Uuid,
    pub body: &'a str,
    pub byline: &'a str,
}

/// Render the plain-text body of a new-note mail.
pub fn render_note_email(inbox_slug: &str, note: &NoteEmail<'_>, base_url: &str) -> String {
    let byline = if note.byline.is_empty() {
        "Anonymous"
    } else {
        note.byline
    };
    format!(
        "Hi {inbox_slug},\n\n\
         Someone sent a note to your SayThanks inbox:\n\n\
         {body}\n\n\
         -- {byline}\n\n\
         Share it: {share}\n\
         Manage your inbox: {dashboard}\n",
        body = note.body,
        share = note_share_url(base_url, note.uuid),
        dashboard = dashboard_url(base_url),
    )
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends new-note notification emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    /// Create a new email delivery service with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Email the owner of `inbox_slug` about a note they just received.
    pub async fn deliver_note(
        &self,
        to_email: &str,
        inbox_slug: &str,
        note: &NoteEmail<'_>,
    ) -> Result<(), EmailError> {
        let body = render_note_email(inbox_slug, note, &self.config.base_url);

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(NOTE_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port)
                .timeout(Some(self.config.timeout));

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        // The transport timeout covers single socket operations; this bounds
        // the whole exchange, including a server that never greets.
        tokio::time::timeout(self.config.timeout, mailer.send(email))
            .await
            .map_err(|_| EmailError::Timeout(self.config.timeout))??;

        tracing::info!(inbox = inbox_slug, note = %note.uuid, "Note notification email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
