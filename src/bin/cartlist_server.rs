use std::sync::Arc;

use anyhow::{Context, Result};
use cartlist::{AppConfig, AppState, JsonFileStore, build_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "cartlist=debug,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env().context("failed to load server configuration")?;

    let store = JsonFileStore::new(&config.data_file);
    info!(path = %store.path().display(), "item document");

    let app = build_router(AppState::new(Arc::new(store)), &config.allowed_origins);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, origins = ?config.allowed_origins, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM. A signal whose handler cannot be
/// installed is logged and never fires.
async fn shutdown_signal() {
    let reason = tokio::select! {
        () = interrupt() => "interrupt",
        () = terminate() => "terminate",
    };
    info!(signal = reason, "shutting down");
}

async fn interrupt() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Ctrl+C handler unavailable");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(err) => {
            error!(error = %err, "SIGTERM handler unavailable");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
