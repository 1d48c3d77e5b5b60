//! # Application State
//!
//! Shared state for the Axum application.
//! Configuration is resolved once at startup and never mutated afterwards;
//! handlers reach the outbound providers through the trait objects held here.

use relay_core::{parse_flag, BoxedMailRelay, BoxedPaymentProvider, EmailMode, EmailPolicy};
use relay_mail::{parse_mailbox, SmtpConfig, SmtpMailRelay};
use relay_stripe::StripePaymentProvider;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use thiserror::Error;

/// Origins allowed to call the API from a browser
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = [
    "http://localhost:5173",
    "https://marvey-new-clean-96n2.vercel.app",
];

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SENDER: &str = "appointmentstudio1@studio.com";
const DEFAULT_OPERATOR_NAME: &str = "Marvey";

/// Invalid process configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Origins permitted to make cross-origin requests
    pub allowed_origins: Vec<String>,
    /// How send-email requests are delivered
    pub email_mode: EmailMode,
    /// "From" address on outgoing mail
    pub email_from: String,
    /// Operator mailbox that receives notifications
    pub email_contact: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        let allowed_origins = match get("CORS_ALLOWED_ORIGINS") {
            Some(raw) => {
                let origins: Vec<String> = raw
                    .split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .filter(|o| !o.is_empty())
                    .collect();
                if origins.is_empty() {
                    return Err(ConfigError::Empty("CORS_ALLOWED_ORIGINS"));
                }
                origins
            }
            None => defaults.allowed_origins,
        };

        let email_mode = match get("EMAIL_MODE").map(|m| m.to_ascii_lowercase()).as_deref() {
            None | Some("notify") => EmailMode::Notify {
                operator_name: get("EMAIL_OPERATOR_NAME")
                    .unwrap_or_else(|| DEFAULT_OPERATOR_NAME.to_string()),
            },
            Some("forward") => EmailMode::Forward {
                require_recipient: flag("EMAIL_REQUIRE_TO", get("EMAIL_REQUIRE_TO"), true)?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "EMAIL_MODE",
                    value: other.to_string(),
                })
            }
        };

        let email_from = get("EMAIL_FROM").unwrap_or(defaults.email_from);
        let email_contact = get("EMAIL_CONTACT").unwrap_or_else(|| email_from.clone());
        for (key, value) in [("EMAIL_FROM", &email_from), ("EMAIL_CONTACT", &email_contact)] {
            if parse_mailbox(value).is_err() {
                return Err(ConfigError::Invalid {
                    key,
                    value: value.clone(),
                });
            }
        }

        let log_format = match get("LOG_FORMAT").map(|f| f.to_ascii_lowercase()).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            allowed_origins,
            email_mode,
            email_from,
            email_contact,
            log_format,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::Invalid {
            key: "HOST",
            value: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Check an `Origin` header value against the allow-list
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }

    /// Email policy derived from this configuration
    pub fn email_policy(&self) -> EmailPolicy {
        EmailPolicy::new(
            self.email_mode.clone(),
            self.email_from.clone(),
            self.email_contact.clone(),
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            email_mode: EmailMode::default(),
            email_from: DEFAULT_SENDER.to_string(),
            email_contact: DEFAULT_SENDER.to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: Arc<AppConfig>,
    /// Payment-intent provider
    pub payments: BoxedPaymentProvider,
    /// Outbound mail relay
    pub mailer: BoxedMailRelay,
    /// Email delivery policy
    pub email: Arc<EmailPolicy>,
}

impl AppState {
    /// Create state around explicit providers
    pub fn new(config: AppConfig, payments: BoxedPaymentProvider, mailer: BoxedMailRelay) -> Self {
        let email = Arc::new(config.email_policy());
        Self {
            config: Arc::new(config),
            payments,
            mailer,
            email,
        }
    }

    /// Create state with the Stripe provider and SMTP relay.
    ///
    /// Fails when the Stripe secret key is missing; the service cannot do its
    /// job without it.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let stripe = StripePaymentProvider::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        let smtp_config = SmtpConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load SMTP settings: {}", e))?;
        if !smtp_config.has_credentials() {
            tracing::warn!("SMTP_USER/SMTP_PASS (or EMAIL_USER/EMAIL_PASS) not set; email sends will likely fail");
        }
        let mailer = SmtpMailRelay::new(smtp_config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize SMTP relay: {}", e))?;

        Ok(Self::new(config, Arc::new(stripe), Arc::new(mailer)))
    }
}

fn flag(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_app_config_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.allowed_origins, DEFAULT_ALLOWED_ORIGINS);
        assert_eq!(config.email_from, "appointmentstudio1@studio.com");
        assert_eq!(config.email_contact, "appointmentstudio1@studio.com");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(
            config.email_mode,
            EmailMode::Notify {
                operator_name: "Marvey".to_string()
            }
        );
    }

    #[test]
    fn test_socket_addr() {
        let config = config_from(&[("HOST", "127.0.0.1"), ("PORT", "3000")]).unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_port_and_host() {
        assert!(config_from(&[("PORT", "five")]).is_err());

        let config = config_from(&[("HOST", "not a host")]).unwrap();
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_allowed_origins_override() {
        let config = config_from(&[(
            "CORS_ALLOWED_ORIGINS",
            "https://a.example/, https://b.example ,",
        )])
        .unwrap();
        assert_eq!(config.allowed_origins, vec!["https://a.example", "https://b.example"]);
        assert!(config.is_origin_allowed("https://a.example"));
        assert!(!config.is_origin_allowed("http://localhost:5173"));

        assert!(config_from(&[("CORS_ALLOWED_ORIGINS", " , ")]).is_err());
    }

    #[test]
    fn test_forward_mode() {
        let config = config_from(&[
            ("EMAIL_MODE", "forward"),
            ("EMAIL_REQUIRE_TO", "false"),
            ("EMAIL_FROM", "noreply@studio.com"),
            ("EMAIL_CONTACT", "owner@studio.com"),
        ])
        .unwrap();
        assert_eq!(
            config.email_mode,
            EmailMode::Forward {
                require_recipient: false
            }
        );

        let policy = config.email_policy();
        assert_eq!(policy.sender, "noreply@studio.com");
        assert_eq!(policy.contact, "owner@studio.com");
        assert!(!policy.requires_recipient());
    }

    #[test]
    fn test_invalid_sender_or_contact_stops_startup() {
        let err = config_from(&[("EMAIL_FROM", "not-an-address")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "EMAIL_FROM", .. }));

        let err = config_from(&[("EMAIL_CONTACT", "Studio Mailbox")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "EMAIL_CONTACT", .. }));

        let config = config_from(&[("EMAIL_FROM", "Studio <studio@example.com>")]).unwrap();
        assert_eq!(config.email_contact, "Studio <studio@example.com>");
    }

    #[test]
    fn test_invalid_require_to_flag() {
        let err = config_from(&[("EMAIL_MODE", "forward"), ("EMAIL_REQUIRE_TO", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "EMAIL_REQUIRE_TO", .. }));
    }

    #[test]
    fn test_invalid_email_mode_and_log_format() {
        assert!(config_from(&[("EMAIL_MODE", "broadcast")]).is_err());
        assert!(config_from(&[("LOG_FORMAT", "xml")]).is_err());
        assert_eq!(
            config_from(&[("LOG_FORMAT", "JSON")]).unwrap().log_format,
            LogFormat::Json
        );
    }
}
