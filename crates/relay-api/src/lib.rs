//! # relay-api
//!
//! HTTP API layer for studio-relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Payment-intent and email relay endpoints
//! - CORS allow-list and origin guard
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Health check |
//! | GET | `/health` | Health check |
//! | POST | `/create-payment-intent` | Create a payment intent |
//! | POST | `/send-email` | Relay an email |

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, LogFormat};
