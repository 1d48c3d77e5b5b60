//! # Routes
//!
//! Axum router configuration for the relay API.

use crate::handlers;
use crate::middleware::origin_guard;
use crate::state::{AppConfig, AppState};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - GET  /                       - Health check
///   - GET  /health                 - Health check (probe alias)
///   - POST /create-payment-intent  - Create payment intent
///   - POST /send-email             - Relay email
///
/// Layers, outermost first: tracing, CORS, origin guard. The guard only wraps
/// the POST routes; health checks answer whatever the origin.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let health_routes = Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health));

    let relay_routes = Router::new()
        .route("/create-payment-intent", post(handlers::create_payment_intent))
        .route("/send-email", post(handlers::send_email))
        .layer(middleware::from_fn_with_state(state.clone(), origin_guard));

    Router::new()
        .merge(health_routes)
        .merge(relay_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// CORS policy: allow-listed origins, GET/POST, `Content-Type` and `Authorization`
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring unusable CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
