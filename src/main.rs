// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::inspection_gateway::InspectionGateway;
use crate::application::inspection_service::InspectionService;
use crate::application::profile_service::ProfileService;
use crate::infrastructure::config::load_inspector_config;
use crate::infrastructure::http_gateway::HttpInspectionGateway;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_inspector_config().context("Failed to load inspector configuration")?;
    let scoring = config.scoring_engine();

    if config.backend.token.is_none() {
        tracing::warn!("No backend token configured; history will be empty and uploads run in demo mode");
    }

    // Create gateway (infrastructure layer)
    let gateway: Arc<dyn InspectionGateway> = Arc::new(HttpInspectionGateway::new(
        config.backend.base_url.clone(),
        config.backend.token.clone(),
        Duration::from_secs(config.backend.timeout_secs),
        scoring.clone(),
    )?);

    // Create services (application layer)
    let inspection_service =
        InspectionService::new(gateway.clone(), scoring, config.demo_observation());
    let dashboard_service = DashboardService::new(gateway.clone());
    let profile_service = ProfileService::new(gateway);

    // Create application state
    let state = Arc::new(AppState {
        inspection_service,
        dashboard_service,
        profile_service,
    });

    // Build router (presentation layer)
    let router = router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid server.bind address {:?}", config.server.bind))?;
    tracing::info!(
        "Starting building-inspector on {} (backend {})",
        addr,
        config.backend.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
