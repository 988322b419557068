//! HTTP service exposing the scrape trigger and the cached snapshot
//!
//! - `POST /scrape` runs a full aggregation and returns the new summary
//! - `GET /snapshot` returns the last saved summary, or `{}`
//! - `GET /health` for liveness checks

mod origin;
mod routes;

pub use origin::{reject_disallowed_origin, OriginPolicy};
pub use routes::{create_router, ApiError, AppState};

use crate::config::Config;
use crate::scholar::aggregator_from_config;
use crate::storage::{open_store, SnapshotStore};
use crate::Result;
use std::sync::Arc;

/// Builds the router for `config`, wired to the live Scholar profile and
/// the configured snapshot file
pub fn router_from_config(config: &Config) -> Result<axum::Router> {
    let store: Arc<dyn SnapshotStore> = Arc::new(open_store(&config.output));
    let aggregator = aggregator_from_config(config, Arc::clone(&store))?;
    let policy = OriginPolicy::new(config.server.allowed_origin_prefixes.clone());

    Ok(create_router(
        AppState {
            aggregator: Arc::new(aggregator),
            store,
        },
        policy,
    ))
}

/// Binds the listener and serves until Ctrl-C
pub async fn serve(config: Config) -> Result<()> {
    let router = router_from_config(&config)?;
    let address = format!("{}:{}", config.server.bind_address, config.server.port);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
