//! # Payment Intent Types
//!
//! Request/response shapes for creating a payment intent, plus the amount
//! validation that runs before any provider call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RelayError, RelayResult};

const AMOUNT_ERROR: &str = "Amount must be a number";

/// Currency payment intents are denominated in (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
}

impl Currency {
    /// Returns the lowercase ISO 4217 code the provider expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Validate the raw `amount` field of an inbound request.
///
/// The amount is in the smallest currency unit, so it must be a positive
/// whole number. Absent, `null`, strings, booleans, zero, negative and
/// fractional values are all rejected.
pub fn validate_amount(raw: Option<&Value>) -> RelayResult<u64> {
    let number = match raw {
        Some(Value::Number(n)) => n,
        _ => return Err(RelayError::InvalidInput(AMOUNT_ERROR.to_string())),
    };

    if let Some(amount) = number.as_u64() {
        if amount == 0 {
            return Err(RelayError::InvalidInput(
                "Amount must be greater than zero".to_string(),
            ));
        }
        return Ok(amount);
    }

    // Whole-valued floats such as `2000.0` are accepted.
    match number.as_f64() {
        Some(f) if f > 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
        Some(f) if f <= 0.0 => Err(RelayError::InvalidInput(
            "Amount must be greater than zero".to_string(),
        )),
        _ => Err(RelayError::InvalidInput(
            "Amount must be a whole number of the smallest currency unit".to_string(),
        )),
    }
}

/// A validated request to create a payment intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    /// Amount in smallest currency unit (cents for USD)
    pub amount: u64,
    /// Currency the intent is denominated in
    pub currency: Currency,
    /// Let the provider pick the payment methods enabled for the account
    pub automatic_payment_methods: bool,
}

impl PaymentIntentRequest {
    /// Create a USD intent request with automatic payment methods enabled
    pub fn new(amount: u64) -> Self {
        Self {
            amount,
            currency: Currency::USD,
            automatic_payment_methods: true,
        }
    }
}

/// A payment intent as returned by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    /// Provider-side ID (pi_...)
    pub id: String,
    /// Opaque secret the browser uses to confirm the payment
    pub client_secret: String,
    /// Provider status, e.g. `requires_payment_method`
    pub status: Option<String>,
}

/// Response body for a created payment intent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

impl From<PaymentIntent> for PaymentIntentResponse {
    fn from(intent: PaymentIntent) -> Self {
        Self {
            client_secret: intent.client_secret,
        }
    }
}
