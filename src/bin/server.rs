//! # Scanfleet Server
//!
//! Runs the control plane HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default configuration from ./config
//! cargo run --bin scanfleet-server
//!
//! # Run with a specific environment
//! SCANFLEET_ENV=production cargo run --bin scanfleet-server
//! ```

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use scanfleet::config::ConfigManager;
use scanfleet::logging;
use scanfleet::orchestration::OrchestrationBootstrap;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_structured_logging();

    info!("🚀 Starting Scanfleet Server...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));

    let config_manager = ConfigManager::load().context("Failed to load configuration")?;
    info!("   Environment: {}", config_manager.environment());

    let bind_address = config_manager.config().server.bind_address();
    let handle = OrchestrationBootstrap::bootstrap(config_manager)
        .await
        .context("Failed to bootstrap control plane")?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    info!("🎉 Scanfleet Server listening on {}", bind_address);
    info!("   Press Ctrl+C to shutdown gracefully");

    let served = axum::serve(listener, handle.router())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("🔧 Closing connections...");
    handle.shutdown().await;

    if let Err(e) = served {
        error!("HTTP server terminated with error: {}", e);
        return Err(e).context("HTTP server failed");
    }

    info!("👋 Scanfleet Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }

    info!("🛑 Shutdown signal received, initiating graceful shutdown...");
}
