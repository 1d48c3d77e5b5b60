//! # Request Handlers
//!
//! Axum request handlers for the relay API.
//! Every error is converted to a JSON body here; nothing escapes to the
//! server loop.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use relay_core::{
    validate_amount, EmailRequest, EmailResult, PaymentIntentRequest, PaymentIntentResponse,
    RelayError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

/// Liveness text returned by the health check
pub const HEALTH_MESSAGE: &str = "Server is running!!";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create payment intent request.
///
/// `amount` is kept as raw JSON so a wrongly typed value is reported with the
/// same message as a missing one.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    #[serde(default)]
    pub amount: Option<Value>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn relay_error_to_response(err: RelayError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn json_rejection_to_response(rejection: JsonRejection) -> ApiError {
    warn!("Rejected request body: {}", rejection.body_text());
    relay_error_to_response(RelayError::InvalidInput(format!(
        "Invalid JSON body: {}",
        rejection.body_text()
    )))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> &'static str {
    HEALTH_MESSAGE
}

/// Create a payment intent and return its client secret
#[instrument(skip(state, payload))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<CreatePaymentIntentRequest>, JsonRejection>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let Json(request) = payload.map_err(json_rejection_to_response)?;

    let amount = validate_amount(request.amount.as_ref()).map_err(|e| {
        warn!("Rejected payment intent request: {}", e);
        relay_error_to_response(e)
    })?;

    let intent = state
        .payments
        .create_payment_intent(&PaymentIntentRequest::new(amount))
        .await
        .map_err(|e| {
            error!("{} error: {}", state.payments.provider_name(), e);
            relay_error_to_response(e)
        })?;

    info!("Created payment intent: id={}, amount={}", intent.id, amount);

    Ok(Json(intent.into()))
}

/// Relay a form submission as email
#[instrument(skip(state, payload))]
pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Json<EmailResult>, ApiError> {
    let Json(request) = payload.map_err(json_rejection_to_response)?;

    let email = state.email.compose(&request).map_err(|e| {
        warn!("Rejected email request: {}", e);
        relay_error_to_response(e)
    })?;

    state.mailer.send(&email).await.map_err(|e| {
        error!("Email error ({}): {}", state.mailer.relay_name(), e);
        relay_error_to_response(e)
    })?;

    info!("Email relayed via {}", state.mailer.relay_name());

    Ok(Json(EmailResult::sent()))
}
