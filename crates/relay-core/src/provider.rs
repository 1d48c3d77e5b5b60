//! # Provider Traits
//!
//! Seams for the two outbound collaborators. The API layer only ever talks to
//! these traits, so tests can swap in fakes and the concrete Stripe/SMTP
//! clients live in their own crates.
//!
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │ PaymentProvider (trait)  │      │ MailRelay (trait)        │
//! │  └── create_payment_     │      │  └── send()              │
//! │      intent()            │      │                          │
//! └────────────▲─────────────┘      └────────────▲─────────────┘
//!              │                                 │
//!   ┌──────────┴───────────┐          ┌──────────┴───────────┐
//!   │ StripePaymentProvider│          │ SmtpMailRelay        │
//!   └──────────────────────┘          └──────────────────────┘
//! ```

use crate::email::OutboundEmail;
use crate::error::RelayResult;
use crate::payment::{PaymentIntent, PaymentIntentRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// A payment-processing provider that can create payment intents.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment intent and return its client secret.
    ///
    /// Called exactly once per request; implementations must not retry.
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> RelayResult<PaymentIntent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// An outbound mail relay.
#[async_trait]
pub trait MailRelay: Send + Sync {
    /// Dispatch a single message.
    async fn send(&self, email: &OutboundEmail) -> RelayResult<()>;

    /// Get the relay name (for logging).
    fn relay_name(&self) -> &'static str;
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;

/// Type alias for a shared mail relay (dynamic dispatch)
pub type BoxedMailRelay = Arc<dyn MailRelay>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;

    struct DecliningProvider;

    #[async_trait]
    impl PaymentProvider for DecliningProvider {
        async fn create_payment_intent(
            &self,
            _request: &PaymentIntentRequest,
        ) -> RelayResult<PaymentIntent> {
            Err(RelayError::upstream("test", "declined"))
        }

        fn provider_name(&self) -> &'static str {
            "test"
        }
    }

    #[tokio::test]
    async fn test_provider_behind_arc() {
        let provider: BoxedPaymentProvider = Arc::new(DecliningProvider);
        let err = provider
            .create_payment_intent(&PaymentIntentRequest::new(2000))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "declined");
        assert_eq!(provider.provider_name(), "test");
    }
}
