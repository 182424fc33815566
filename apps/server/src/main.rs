//! # ShopBill Server Binary
//!
//! Boots the HTTP application: tracing, configuration, database, router.

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use shopbill_db::{Database, DbConfig};
use shopbill_server::{app, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting ShopBill server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.port,
        db = %config.database_path,
        "Configuration loaded"
    );

    // Connect to database and run migrations
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    let state = AppState::new(db, config);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
