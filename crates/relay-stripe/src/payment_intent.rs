//! # Stripe PaymentIntents
//!
//! Implementation of the Stripe PaymentIntents API.
//! Each call is made exactly once; failures are reported, never retried.

use crate::config::StripeConfig;
use async_trait::async_trait;
use relay_core::{PaymentIntent, PaymentIntentRequest, PaymentProvider, RelayError, RelayResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe PaymentIntent provider
///
/// The browser confirms the intent with the returned client secret, so card
/// data never touches this service.
pub struct StripePaymentProvider {
    config: StripeConfig,
    client: Client,
}

impl StripePaymentProvider {
    /// Create a new Stripe provider
    pub fn new(config: StripeConfig) -> RelayResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| RelayError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> RelayResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Active configuration
    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Build form data for the Stripe API
    fn form_params(request: &PaymentIntentRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("amount", request.amount.to_string()),
            ("currency", request.currency.as_str().to_string()),
        ];
        if request.automatic_payment_methods {
            params.push(("automatic_payment_methods[enabled]", "true".to_string()));
        }
        params
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentProvider {
    #[instrument(skip(self, request), fields(amount = request.amount, currency = %request.currency))]
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> RelayResult<PaymentIntent> {
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        debug!("Creating Stripe payment intent");

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&Self::form_params(request))
            .send()
            .await
            .map_err(|e| RelayError::upstream(PROVIDER, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::upstream(PROVIDER, e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}", status);

            // Parse Stripe error
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(RelayError::upstream(PROVIDER, error_response.error.message));
            }

            return Err(RelayError::upstream(
                PROVIDER,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let intent: StripePaymentIntentResponse = serde_json::from_str(&body).map_err(|e| {
            RelayError::upstream(PROVIDER, format!("Failed to parse Stripe response: {}", e))
        })?;

        let client_secret = intent
            .client_secret
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                RelayError::upstream(PROVIDER, "Stripe response did not include a client secret")
            })?;

        info!("Created Stripe payment intent: id={}", intent.id);

        Ok(PaymentIntent {
            id: intent.id,
            client_secret,
            status: intent.status,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_params() {
        let params = StripePaymentProvider::form_params(&PaymentIntentRequest::new(2000));
        assert_eq!(
            params,
            vec![
                ("amount", "2000".to_string()),
                ("currency", "usd".to_string()),
                ("automatic_payment_methods[enabled]", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_form_params_without_automatic_methods() {
        let mut request = PaymentIntentRequest::new(500);
        request.automatic_payment_methods = false;
        let params = StripePaymentProvider::form_params(&request);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error":{"type":"invalid_request_error","message":"Invalid API Key provided"}}"#;
        let parsed: StripeErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "Invalid API Key provided");
    }

    #[test]
    fn test_provider_name() {
        let provider = StripePaymentProvider::new(StripeConfig::new("sk_test_abc")).unwrap();
        assert_eq!(provider.provider_name(), "stripe");
        assert_eq!(provider.config().api_version, "2022-11-15");
    }
}
