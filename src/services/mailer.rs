//! Outgoing mail.
//!
//! The password reset flow only needs "deliver this message to this address";
//! `Mailer` is that contract. `SmtpMailer` delivers over SMTP, `LogMailer`
//! stands in when no SMTP relay is configured.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp transport: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("mail not configured: {0}")]
    NotConfigured(&'static str),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

// =============================================================================
// SMTP
// =============================================================================

pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let host = self
            .config
            .host
            .as_deref()
            .ok_or(MailError::NotConfigured("SMTP host"))?;

        let builder = if self.config.tls {
            // submission port, upgraded with STARTTLS
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        }
        .port(self.config.port);

        let builder = match (&self.config.username, &self.config.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(builder.build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let from_address = self
            .config
            .from_address
            .as_deref()
            .ok_or(MailError::NotConfigured("from address"))?;

        let from: Mailbox = format!("{} <{}>", self.config.from_name, from_address).parse()?;
        let to: Mailbox = mail.to.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(mail.text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(mail.html_body),
                    ),
            )?;

        self.transport()?.send(message).await?;
        tracing::info!(to = %mail.to, "mail delivered");
        Ok(())
    }
}

// =============================================================================
// LOG ONLY
// =============================================================================

/// Writes messages to the log instead of delivering them. Used when SMTP is
/// not configured, e.g. local development.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::warn!(
            to = %mail.to,
            subject = %mail.subject,
            "SMTP not configured, mail not delivered"
        );
        Ok(())
    }
}

pub fn mailer_from_config(config: &SmtpConfig) -> Arc<dyn Mailer> {
    if config.is_configured() {
        Arc::new(SmtpMailer::new(config.clone()))
    } else {
        Arc::new(LogMailer)
    }
}
