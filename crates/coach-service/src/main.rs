//! Coach Service - post-game match analysis over HTTP
//!
//! Serves health/metrics endpoints and the analysis API. Remote match
//! fetching is enabled when a provider API key is configured.

use anyhow::Result;
use coach_engine::{
    analyzer::MatchAnalyzer,
    gateway::{ProviderClient, RateLimiterRegistry},
    health::{components, HealthRegistry},
    observability::{EngineMetrics, EventLogger},
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting coach-service");

    let config = config::ServiceConfig::load()?;
    info!(api_port = config.api_port, "Service configured");

    let health_registry = HealthRegistry::new();
    health_registry.register(components::GATEWAY).await;
    health_registry.register(components::ANALYZER).await;

    let metrics = EngineMetrics::new();
    let logger = EventLogger::new("coach-service");
    logger.log_startup(SERVICE_VERSION);

    // The provider client only exists when an API key is configured;
    // the inline /analyze endpoint works either way.
    let client = match config.provider_api_key.as_deref() {
        Some(key) if !key.is_empty() => {
            let limiter = Arc::new(RateLimiterRegistry::new(config.limiter_config()));
            let mut client = ProviderClient::new(key, limiter);
            if let Some(base_url) = config.provider_base_url.as_deref() {
                client = client.with_base_url(base_url);
            }
            Some(Arc::new(client))
        }
        _ => {
            warn!("No provider API key configured; remote analysis disabled");
            health_registry
                .set_degraded(components::GATEWAY, "no provider API key configured")
                .await;
            None
        }
    };

    let analyzer = Arc::new(MatchAnalyzer::new());
    let app_state = Arc::new(api::AppState::new(
        health_registry.clone(),
        metrics.clone(),
        analyzer,
        client,
    ));

    health_registry.set_ready(true).await;

    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");
    api_handle.abort();

    Ok(())
}
