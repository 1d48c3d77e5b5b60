//! # Origin Guard
//!
//! Rejects cross-origin requests from origins outside the allow-list before
//! they reach a handler. The CORS layer only controls which response headers
//! a browser sees; this guard makes sure a foreign origin never triggers a
//! payment intent or an email.

use crate::handlers::ErrorResponse;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// Requests without an `Origin` header (same-origin, curl, probes) pass.
pub async fn origin_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let allowed = origin
            .to_str()
            .map(|o| state.config.is_origin_allowed(o))
            .unwrap_or(false);

        if !allowed {
            tracing::warn!(origin = ?origin, path = %request.uri().path(), "Rejected request from disallowed origin");
            return (
                StatusCode::FORBIDDEN,
                Json(ErrorResponse::new("Origin not allowed", 403)),
            )
                .into_response();
        }
    }

    next.run(request).await
}
