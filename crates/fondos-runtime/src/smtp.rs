//! SMTP Mailer
//!
//! Live [`Mailer`] over an authenticated SMTP relay using Lettre.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use fondos_core::error::{FondosError, Result};
use fondos_core::mailer::{Mailer, PurchaseEmail};

const DEFAULT_RELAY: &str = "smtp.gmail.com";
const DEFAULT_FROM: &str = "Motofuria <motofuria@correo.com>";

/// SMTP mailer configuration
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    /// Relay host
    pub relay: String,

    /// SMTP account username
    pub username: String,

    /// SMTP account password (app password for Gmail)
    pub password: String,

    /// Sender header
    pub from: String,
}

impl SmtpConfig {
    /// Create from environment variables (`SMTP_USER`, `SMTP_PASS`,
    /// optional `SMTP_RELAY`).
    pub fn from_env() -> Result<Self> {
        let username = std::env::var("SMTP_USER")
            .map_err(|_| FondosError::Config("SMTP_USER not set".into()))?;
        let password = std::env::var("SMTP_PASS")
            .map_err(|_| FondosError::Config("SMTP_PASS not set".into()))?;
        let relay = std::env::var("SMTP_RELAY").unwrap_or_else(|_| DEFAULT_RELAY.into());

        Ok(Self { relay, username, password, from: DEFAULT_FROM.into() })
    }
}

/// SMTP mail relay
pub struct SmtpMailer {
    relay: String,
    credentials: Credentials,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            relay: config.relay,
            credentials: Credentials::new(config.username, config.password),
            from: config.from,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(SmtpConfig::from_env()?))
    }

    /// Build a fresh transport per send to avoid connection-pooling issues.
    fn build_transport(&self) -> Result<SmtpTransport> {
        Ok(SmtpTransport::relay(&self.relay)
            .map_err(|e| FondosError::Mail(format!("SMTP relay error: {e}")))?
            .credentials(self.credentials.clone())
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &PurchaseEmail) -> Result<()> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| FondosError::Mail(format!("invalid from address: {e}")))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| FondosError::Mail(format!("invalid to address: {e}")))?)
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| FondosError::Mail(format!("failed to build email: {e}")))?;

        let mailer = self.build_transport()?;

        tokio::task::spawn_blocking(move || {
            mailer
                .send(&message)
                .map_err(|e| FondosError::Mail(format!("failed to send email: {e}")))
        })
        .await
        .map_err(|e| FondosError::Mail(format!("email task failed: {e}")))?
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_builds_for_default_relay() {
        let mailer = SmtpMailer::new(SmtpConfig {
            relay: DEFAULT_RELAY.into(),
            username: "motofuria@correo.com".into(),
            password: "app-password".into(),
            from: DEFAULT_FROM.into(),
        });
        assert!(mailer.build_transport().is_ok());
    }
}
