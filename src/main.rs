// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{routing::get, Router};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::application::aggregator::DailyAggregator;
use crate::application::chart_service::ChartService;
use crate::infrastructure::config::{load_engine_config, load_thresholds_config};
use crate::infrastructure::http_source::HttpSnapshotSource;
use crate::infrastructure::poller::{run_poller, PollStatus};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    chart_frame, chart_hover, health_check, list_metrics, poll_status,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let engine_config = load_engine_config()?;
    let thresholds_config = load_thresholds_config()?;

    // Shared engine state
    let aggregator = Arc::new(RwLock::new(DailyAggregator::new()));
    let status = Arc::new(RwLock::new(PollStatus::default()));

    // Ingestion (infrastructure layer)
    let source = Arc::new(HttpSnapshotSource::new(engine_config.source_url.clone()));
    tokio::spawn(run_poller(
        source,
        aggregator.clone(),
        status.clone(),
        Duration::from_secs(engine_config.poll_interval_secs),
    ));

    // Services (application layer)
    let chart_service = ChartService::new(aggregator, thresholds_config);

    // Application state
    let state = Arc::new(AppState {
        chart_service,
        poll_status: status,
        chart_defaults: engine_config.chart.clone(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/metrics", get(list_metrics))
        .route("/status", get(poll_status))
        .route("/charts/:metric", get(chart_frame))
        .route("/charts/:metric/hover", get(chart_hover))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = engine_config.bind_address.parse()?;
    tracing::info!("Starting airchart service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
