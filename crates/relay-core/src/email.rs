//! # Email Types
//!
//! Inbound email requests and the policy that turns them into an outbound
//! message. The policy decides between two delivery modes:
//!
//! - **Notify**: the caller's subject and body are wrapped in a fixed
//!   notification template and sent to the operator's own mailbox.
//! - **Forward**: the caller's subject and body are sent verbatim to the
//!   address given in `to`.

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, RelayResult};

/// Subject line used for template-wrapped notifications
pub const NOTIFICATION_SUBJECT: &str = "You got a new email";

/// Inbound send-email request. Every field is optional on the wire so that
/// missing fields surface as `InvalidInput` rather than a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

/// Delivery mode for the send-email endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailMode {
    /// Wrap the message in the notification template and send it to the
    /// contact mailbox. `to` is ignored.
    Notify { operator_name: String },
    /// Send subject and body verbatim to `to`. When `require_recipient` is
    /// false a missing `to` falls back to the contact mailbox.
    Forward { require_recipient: bool },
}

impl Default for EmailMode {
    fn default() -> Self {
        EmailMode::Notify {
            operator_name: "Marvey".to_string(),
        }
    }
}

/// A fully resolved message ready for the mail relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Process-wide email settings: delivery mode plus sender and contact mailboxes
#[derive(Debug, Clone)]
pub struct EmailPolicy {
    pub mode: EmailMode,
    /// "From" address on every outbound message
    pub sender: String,
    /// Operator mailbox that receives notifications
    pub contact: String,
}

impl EmailPolicy {
    pub fn new(mode: EmailMode, sender: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            mode,
            sender: sender.into(),
            contact: contact.into(),
        }
    }

    /// Whether callers must supply `to`
    pub fn requires_recipient(&self) -> bool {
        matches!(
            self.mode,
            EmailMode::Forward {
                require_recipient: true
            }
        )
    }

    /// Validate a request and build the message to send.
    ///
    /// Runs before any relay call; a missing required field is `InvalidInput`.
    pub fn compose(&self, request: &EmailRequest) -> RelayResult<OutboundEmail> {
        let subject = present(&request.subject);
        let html = present(&request.html);

        let (subject, html) = match (subject, html) {
            (Some(s), Some(h)) => (s, h),
            _ => return Err(self.missing_fields()),
        };

        match &self.mode {
            EmailMode::Notify { operator_name } => Ok(OutboundEmail {
                from: self.sender.clone(),
                to: self.contact.clone(),
                subject: NOTIFICATION_SUBJECT.to_string(),
                html: notification_html(operator_name, subject, html),
            }),
            EmailMode::Forward { require_recipient } => {
                let to = match present(&request.to) {
                    Some(to) => to.to_string(),
                    None if *require_recipient => return Err(self.missing_fields()),
                    None => self.contact.clone(),
                };
                Ok(OutboundEmail {
                    from: self.sender.clone(),
                    to,
                    subject: subject.to_string(),
                    html: html.to_string(),
                })
            }
        }
    }

    fn missing_fields(&self) -> RelayError {
        let message = if self.requires_recipient() {
            "Missing to, subject or html"
        } else {
            "Missing subject or html"
        };
        RelayError::InvalidInput(message.to_string())
    }
}

/// Acknowledgment of a successful send; failures travel as `RelayError`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailResult {
    pub success: bool,
}

impl EmailResult {
    pub fn sent() -> Self {
        Self { success: true }
    }
}

// Only absent and empty count as missing; whitespace is content.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

fn notification_html(operator_name: &str, subject: &str, html: &str) -> String {
    format!(
        "<p>Hey {},</p><p>You got a new email! Here's the message:</p>\
         <p><strong>Subject:</strong> {}</p>\
         <p><strong>Message:</strong><br>{}</p>",
        escape_html(operator_name),
        escape_html(subject),
        html
    )
}

// The body is HTML by contract; only plain-text fields are escaped.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
