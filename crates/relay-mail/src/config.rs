//! # SMTP Configuration
//!
//! Relay credentials are read from the environment once at startup. Two
//! naming schemes are accepted for the account: `SMTP_USER`/`SMTP_PASS` and
//! `EMAIL_USER`/`EMAIL_PASS`.

use relay_core::{parse_flag, RelayError};
use std::env;
use std::time::Duration;

const DEFAULT_HOST: &str = "smtp.gmail.com";
const DEFAULT_PORT: u16 = 465;

/// SMTP relay configuration
#[derive(Clone)]
pub struct SmtpConfig {
    /// Relay hostname
    pub host: String,
    /// Relay port (465 for implicit TLS, 587 for STARTTLS)
    pub port: u16,
    /// Account username
    pub username: Option<String>,
    /// Account password or app password
    pub password: Option<String>,
    /// Implicit TLS from the first byte; STARTTLS otherwise
    pub secure: bool,
    /// Skip certificate and hostname verification
    pub accept_invalid_certs: bool,
    /// Connection and command timeout
    pub timeout: Duration,
}

impl SmtpConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `SMTP_HOST` (default `smtp.gmail.com`)
    /// - `SMTP_PORT` (default 465)
    /// - `SMTP_USER` or `EMAIL_USER`
    /// - `SMTP_PASS` or `EMAIL_PASS`
    /// - `SMTP_SECURE` (default true)
    /// - `SMTP_ACCEPT_INVALID_CERTS` (default true)
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("SMTP_PORT") {
            Some(raw) => raw.parse().map_err(|_| {
                RelayError::Configuration(format!("SMTP_PORT is not a valid port: {}", raw))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            username: get("SMTP_USER").or_else(|| get("EMAIL_USER")),
            password: get("SMTP_PASS").or_else(|| get("EMAIL_PASS")),
            secure: flag("SMTP_SECURE", get("SMTP_SECURE"), true)?,
            accept_invalid_certs: flag(
                "SMTP_ACCEPT_INVALID_CERTS",
                get("SMTP_ACCEPT_INVALID_CERTS"),
                true,
            )?,
            timeout: Duration::from_secs(30),
        })
    }

    /// Create config for a host with explicit credentials
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: Some(username.into()),
            password: Some(password.into()),
            secure: true,
            accept_invalid_certs: true,
            timeout: Duration::from_secs(30),
        }
    }

    /// Whether both halves of the account credentials are present
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("secure", &self.secure)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

fn flag(key: &str, raw: Option<String>, default: bool) -> Result<bool, RelayError> {
    match raw {
        None => Ok(default),
        Some(raw) => parse_flag(&raw).ok_or_else(|| {
            RelayError::Configuration(format!("{} must be true or false, got {}", key, raw))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SmtpConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, "smtp.gmail.com");
        assert_eq!(config.port, 465);
        assert!(config.secure);
        assert!(config.accept_invalid_certs);
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_smtp_naming_variant() {
        let config = SmtpConfig::from_lookup(lookup(&[
            ("SMTP_USER", " studio@gmail.com\n"),
            ("SMTP_PASS", "app-password "),
        ]))
        .unwrap();
        assert_eq!(config.username.as_deref(), Some("studio@gmail.com"));
        assert_eq!(config.password.as_deref(), Some("app-password"));
        assert!(config.has_credentials());
    }

    #[test]
    fn test_email_naming_variant() {
        let config = SmtpConfig::from_lookup(lookup(&[
            ("EMAIL_USER", "studio@gmail.com"),
            ("EMAIL_PASS", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.username.as_deref(), Some("studio@gmail.com"));
        assert_eq!(config.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_smtp_variant_wins() {
        let config = SmtpConfig::from_lookup(lookup(&[
            ("SMTP_USER", "primary@gmail.com"),
            ("EMAIL_USER", "fallback@gmail.com"),
        ]))
        .unwrap();
        assert_eq!(config.username.as_deref(), Some("primary@gmail.com"));
    }

    #[test]
    fn test_starttls_and_strict_certs() {
        let config = SmtpConfig::from_lookup(lookup(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "587"),
            ("SMTP_SECURE", "false"),
            ("SMTP_ACCEPT_INVALID_CERTS", "no"),
        ]))
        .unwrap();
        assert_eq!(config.host, "smtp.example.com");
        assert_eq!(config.port, 587);
        assert!(!config.secure);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_invalid_values() {
        assert!(SmtpConfig::from_lookup(lookup(&[("SMTP_PORT", "smtp")])).is_err());
        assert!(SmtpConfig::from_lookup(lookup(&[("SMTP_SECURE", "maybe")])).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", SmtpConfig::new("smtp.gmail.com", "u", "hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
