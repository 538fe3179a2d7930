//! Cluster Dashboard - simulated cluster observability backend
//!
//! Serves fabricated cluster state, alerts, scans and cost estimates to
//! the browser UI, a scripted pod terminal over a websocket, and
//! Prometheus metrics on a separate scrape port.

use dashboard_lib::{
    api::{self, AppState},
    health::{components, HealthRegistry},
    ClusterStateService, DashboardConfig, DashboardMetrics, StructuredLogger,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DASHBOARD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting cluster-dashboard");

    // Empty name pools are rejected here, before anything listens
    let config = DashboardConfig::load().context("Invalid dashboard configuration")?;
    info!(
        nodes = ?config.node_names,
        pods = ?config.pod_names,
        cors = ?config.cors_origins,
        seeded = config.rng_seed.is_some(),
        "Dashboard configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::METRICS_SERVER).await;

    let metrics = DashboardMetrics::new();
    let logger = StructuredLogger::new("cluster-dashboard");

    let service = ClusterStateService::from_config(&config, metrics.clone())
        .context("Failed to build cluster state service")?;

    let app_state = Arc::new(AppState::new(
        service,
        health_registry.clone(),
        metrics,
        logger.clone(),
    ));

    // Started once; serves until the process exits
    let _metrics_handle = api::spawn_metrics_server(config.metrics_port, app_state.clone());

    let router = api::create_router(app_state, &config.cors_origins);
    health_registry.set_ready(true).await;
    logger.log_startup(
        DASHBOARD_VERSION,
        config.port,
        config.metrics_port,
        config.node_names.len(),
    );

    tokio::select! {
        result = api::serve(config.port, router) => {
            if let Err(e) = result {
                error!(error = %e, "API server failed");
                logger.log_shutdown("API server failed");
                return Err(e);
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
