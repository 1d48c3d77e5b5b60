//! # Studio Relay
//!
//! Payment-intent and email relay backend.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export SMTP_USER=studio@gmail.com
//! export SMTP_PASS=app-password
//!
//! # Run the server
//! studio-relay
//! ```

use relay_api::{routes, AppConfig, AppState, LogFormat};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize logging
    init_tracing(config.log_format);

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::from_config(config)?;

    let addr = state.config.socket_addr()?;

    info!("Allowed origins: {:?}", state.config.allowed_origins);
    info!("Email mode: {:?}", state.config.email_mode);
    info!(
        "Providers: payments={}, mail={}",
        state.payments.provider_name(),
        state.mailer.relay_name()
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on port {}", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

fn print_banner() {
    println!(
        r#"
  Studio Relay
  ━━━━━━━━━━━━━━━━━━━━━━━
  Payments + email relay
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
