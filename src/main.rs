//! fest-events server entry point.
//!
//! Starts the Axum HTTP server with the Event REST endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use fest_events::api;
use fest_events::app_state::AppState;
use fest_events::config::{FestConfig, LogFormat};
use fest_events::error::EventError;
use fest_events::persistence::{EventStore, MemoryEventStore, PgEventStore};
use fest_events::service::EventService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = FestConfig::from_env()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(
        addr = %config.listen_addr,
        persistence = config.persistence_enabled,
        "starting fest-events"
    );

    // Open the store and register the schema once
    let store_config = &config;
    let event_service = EventService::handle(|| async move {
        let store: Arc<dyn EventStore> = if store_config.persistence_enabled {
            Arc::new(PgEventStore::connect(store_config).await?)
        } else {
            tracing::warn!("persistence disabled, events are kept in memory");
            Arc::new(MemoryEventStore::new())
        };
        Ok::<_, EventError>(store)
    })
    .await
    .context("failed to initialize event store")?;

    let app = api::build_app(AppState { event_service });

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
