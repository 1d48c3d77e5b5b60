//! # relay-stripe
//!
//! Stripe payment provider for studio-relay.
//!
//! Creates PaymentIntents through the Stripe REST API and hands the client
//! secret back so the browser can confirm the payment with Stripe.js.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay_core::{PaymentIntentRequest, PaymentProvider};
//! use relay_stripe::StripePaymentProvider;
//!
//! // Create provider from environment
//! let provider = StripePaymentProvider::from_env()?;
//!
//! let intent = provider
//!     .create_payment_intent(&PaymentIntentRequest::new(2000))
//!     .await?;
//!
//! // Return intent.client_secret to the frontend
//! ```

pub mod config;
pub mod payment_intent;

// Re-exports
pub use config::StripeConfig;
pub use payment_intent::StripePaymentProvider;
