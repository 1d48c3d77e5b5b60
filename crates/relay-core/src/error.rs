//! # Relay Error Types
//!
//! Typed error handling for studio-relay.
//! Every handler outcome is either a success or one of these variants.

use thiserror::Error;

/// Core error type for all relay operations
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or mistyped request field, detected before any outbound call
    #[error("{0}")]
    InvalidInput(String),

    /// The payment provider or mail relay rejected or failed the call.
    ///
    /// Displays as the bare upstream message so callers see exactly what the
    /// provider said.
    #[error("{message}")]
    UpstreamFailure { provider: String, message: String },

    /// Configuration errors (missing keys, invalid values)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RelayError {
    /// Shorthand for an upstream failure from the named provider
    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        RelayError::UpstreamFailure {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::InvalidInput(_) => 400,
            RelayError::UpstreamFailure { .. } => 500,
            RelayError::Configuration(_) => 500,
        }
    }

    /// Returns true if the caller is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::InvalidInput(_))
    }
}

/// Result type alias for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RelayError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(RelayError::upstream("stripe", "boom").status_code(), 500);
        assert_eq!(RelayError::Configuration("x".into()).status_code(), 500);
    }

    #[test]
    fn test_upstream_displays_bare_message() {
        let err = RelayError::upstream("stripe", "Invalid API Key provided: sk_test_***");
        assert_eq!(err.to_string(), "Invalid API Key provided: sk_test_***");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_invalid_input_is_client_error() {
        let err = RelayError::InvalidInput("Amount must be a number".into());
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Amount must be a number");
    }
}
