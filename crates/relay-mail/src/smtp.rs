//! # SMTP Transport
//!
//! `MailRelay` implementation backed by lettre's async SMTP transport.

use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use relay_core::{MailRelay, OutboundEmail, RelayError, RelayResult};
use tracing::{debug, error, info, instrument, warn};

const RELAY: &str = "smtp";

/// SMTP mail relay
///
/// The transport connects lazily on each send, so building the relay never
/// touches the network.
pub struct SmtpMailRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailRelay {
    /// Create a new relay from configuration
    pub fn new(config: SmtpConfig) -> RelayResult<Self> {
        let tls_parameters = TlsParameters::builder(config.host.clone())
            .dangerous_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| RelayError::Configuration(format!("Invalid SMTP TLS settings: {}", e)))?;

        let tls = if config.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Required(tls_parameters)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(tls)
            .timeout(Some(config.timeout));

        match (config.username, config.password) {
            (Some(username), Some(password)) => {
                builder = builder.credentials(Credentials::new(username, password));
            }
            _ => warn!("SMTP credentials not set; sending without authentication"),
        }

        if config.accept_invalid_certs {
            debug!("SMTP certificate validation is relaxed");
        }

        Ok(Self {
            transport: builder.build(),
            host: config.host,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> RelayResult<Self> {
        let config = SmtpConfig::from_env()?;
        Self::new(config)
    }

    /// Relay hostname
    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Parse an address such as `studio@example.com` or `Studio <studio@example.com>`
pub fn parse_mailbox(address: &str) -> Result<Mailbox, AddressError> {
    address.parse()
}

/// Build an HTML message from an outbound email.
///
/// The sender comes from configuration, so a bad one is a `Configuration`
/// error; a bad recipient is the caller's and comes back as `InvalidInput`.
pub fn build_message(email: &OutboundEmail) -> RelayResult<Message> {
    let from = parse_mailbox(&email.from).map_err(|e| {
        RelayError::Configuration(format!("Invalid sender address: {}: {}", email.from, e))
    })?;
    let to = parse_mailbox(&email.to).map_err(|e| {
        RelayError::InvalidInput(format!("Invalid email address: {}: {}", email.to, e))
    })?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())
        .map_err(|e| RelayError::InvalidInput(format!("Invalid email: {}", e)))
}

#[async_trait]
impl MailRelay for SmtpMailRelay {
    #[instrument(skip(self, email), fields(host = %self.host))]
    async fn send(&self, email: &OutboundEmail) -> RelayResult<()> {
        let message = build_message(email)?;

        let response = self.transport.send(message).await.map_err(|e| {
            error!("SMTP send failed: {}", e);
            RelayError::upstream(RELAY, e.to_string())
        })?;

        info!("Email accepted by relay: code={}", response.code());
        Ok(())
    }

    fn relay_name(&self) -> &'static str {
        RELAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &str) -> OutboundEmail {
        OutboundEmail {
            from: "appointmentstudio1@studio.com".to_string(),
            to: to.to_string(),
            subject: "You got a new email".to_string(),
            html: "<p>Hey Marvey,</p>".to_string(),
        }
    }

    #[test]
    fn test_build_message() {
        let message = build_message(&email("a@b.com")).unwrap();

        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 1);
        assert_eq!(envelope.to()[0].to_string(), "a@b.com");
        assert_eq!(
            envelope.from().map(|a| a.to_string()).as_deref(),
            Some("appointmentstudio1@studio.com")
        );

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: You got a new email"));
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("<p>Hey Marvey,</p>"));
    }

    #[test]
    fn test_invalid_recipient_is_invalid_input() {
        let err = build_message(&email("not-an-address")).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("not-an-address"));
    }

    #[test]
    fn test_invalid_sender_is_configuration_error() {
        let mut bad = email("a@b.com");
        bad.from = "Studio Mailbox".to_string();
        let err = build_message(&bad).unwrap_err();
        assert!(matches!(err, RelayError::Configuration(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_parse_mailbox() {
        assert!(parse_mailbox("appointmentstudio1@studio.com").is_ok());
        assert!(parse_mailbox("Studio <studio@example.com>").is_ok());
        assert!(parse_mailbox("not-an-address").is_err());
    }

    #[tokio::test]
    async fn test_relay_builds_without_network() {
        let relay = SmtpMailRelay::new(SmtpConfig::new("smtp.gmail.com", "u", "p")).unwrap();
        assert_eq!(relay.host(), "smtp.gmail.com");
        assert_eq!(relay.relay_name(), "smtp");
    }

    #[tokio::test]
    async fn test_send_rejects_bad_address_before_connecting() {
        let relay = SmtpMailRelay::new(SmtpConfig::new("smtp.invalid", "u", "p")).unwrap();
        let err = relay.send(&email("nope")).await.unwrap_err();
        assert!(matches!(err, RelayError::InvalidInput(_)));
    }
}
