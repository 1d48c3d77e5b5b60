//! # relay-mail
//!
//! SMTP mail relay for studio-relay.
//!
//! Sends HTML email through an authenticated SMTP account (Gmail by default)
//! over TLS. Certificate validation can be relaxed for relays that present
//! self-signed certificates.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay_core::{MailRelay, OutboundEmail};
//! use relay_mail::SmtpMailRelay;
//!
//! let relay = SmtpMailRelay::from_env()?;
//! relay.send(&OutboundEmail {
//!     from: "studio@example.com".into(),
//!     to: "owner@example.com".into(),
//!     subject: "Hello".into(),
//!     html: "<p>Hi</p>".into(),
//! }).await?;
//! ```

pub mod config;
pub mod smtp;

// Re-exports
pub use config::SmtpConfig;
pub use smtp::{build_message, parse_mailbox, SmtpMailRelay};
