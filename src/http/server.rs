//! HTTP server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::info;

use crate::{Engine, MarketflowError, Result, config::ServerConfig, http::AppState};

use super::routes::create_router;

/// Serve the workflow API until ctrl-c or SIGTERM.
pub async fn serve(
    config: ServerConfig,
    engine: Arc<Engine>,
) -> Result<()> {
    let app = create_router(AppState::new(engine));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse().map_err(|e| MarketflowError::Config(format!("invalid server address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("workflow API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("received ctrl-c");
                }
                _ = wait_for_sigterm() => {
                    info!("received SIGTERM");
                }
            }
            info!("starting graceful shutdown");
        })
        .await?;

    info!("server shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to setup SIGTERM handler");
    sigterm.recv().await;
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
