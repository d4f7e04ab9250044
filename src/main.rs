// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::application::clock::SystemClock;
use crate::application::poller::ZonePoller;
use crate::application::summary_cache::SummaryCache;
use crate::application::zone_service::ZoneService;
use crate::infrastructure::config::load_config;
use crate::infrastructure::memory_session::InMemorySessionStore;
use crate::infrastructure::sensor_api::SensorApiSource;
use crate::presentation::app_state::AppState;
use crate::presentation::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_config().context("failed to load configuration")?;

    // Create data source and session store (infrastructure layer)
    let source = Arc::new(
        SensorApiSource::new(
            &config.backend.base_url,
            Duration::from_secs(config.backend.timeout_secs),
        )
        .context("failed to build sensor API client")?,
    );
    let sessions = Arc::new(match &config.backend.token {
        Some(token) => InMemorySessionStore::with_token(token.clone()),
        None => InMemorySessionStore::default(),
    });

    // Create services (application layer)
    let zone_service = ZoneService::new(
        source,
        sessions,
        Arc::new(SystemClock),
        config.pipeline.clone(),
    );
    let summary_cache = SummaryCache::default();

    let cancel_token = CancellationToken::new();
    let poller = if config.poller.enabled && !config.poller.cameras.is_empty() {
        Some(
            ZonePoller::new(
                zone_service.clone(),
                summary_cache.clone(),
                config.poller.cameras.clone(),
                Duration::from_secs(config.poller.interval_secs),
                config.poller.lookback_hours,
            )
            .spawn(cancel_token.child_token()),
        )
    } else {
        tracing::info!("zone poller disabled");
        None
    };

    // Create application state
    let state = Arc::new(AppState {
        zone_service,
        summary_cache,
    });

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, backend = %config.backend.base_url, "starting zone-telemetry service");

    let shutdown = cancel_token.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("received ctrl-c, initiating shutdown");
        shutdown.cancel();
    });

    axum::serve(listener, router(state))
        .with_graceful_shutdown(cancel_token.clone().cancelled_owned())
        .await?;

    cancel_token.cancel();
    if let Some(poller) = poller {
        let _ = poller.await;
    }

    Ok(())
}
