//! # relay-core
//!
//! Core types and traits for the studio-relay service.
//!
//! This crate provides:
//! - `PaymentProvider` and `MailRelay` traits for the outbound collaborators
//! - `PaymentIntentRequest` and amount validation for payment intents
//! - `EmailRequest`, `EmailPolicy` and `OutboundEmail` for the email relay
//! - `RelayError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use relay_core::{validate_amount, PaymentIntentRequest, PaymentProvider};
//!
//! let amount = validate_amount(body.get("amount"))?;
//! let intent = provider
//!     .create_payment_intent(&PaymentIntentRequest::new(amount))
//!     .await?;
//!
//! // Hand intent.client_secret back to the browser
//! ```

pub mod email;
pub mod env;
pub mod error;
pub mod payment;
pub mod provider;

// Re-exports for convenience
pub use email::{EmailMode, EmailPolicy, EmailRequest, EmailResult, OutboundEmail};
pub use env::parse_flag;
pub use error::{RelayError, RelayResult};
pub use payment::{
    validate_amount, Currency, PaymentIntent, PaymentIntentRequest, PaymentIntentResponse,
};
pub use provider::{BoxedMailRelay, BoxedPaymentProvider, MailRelay, PaymentProvider};
