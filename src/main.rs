//! Fraud Detection Dashboard - Main Entry Point
//!
//! Loads the classifier once at startup, then serves the upload page and the
//! prediction API.

use anyhow::{Context, Result};
use fraud_dashboard::{
    config::{AppConfig, LoggingConfig},
    metrics::{DashboardMetrics, MetricsReporter},
    models::provider::ModelProvider,
    server::{create_router, AppState},
    FEATURE_COUNT,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "fraud_dashboard={level},tower_http={level}",
            level = logging.level
        ))
    })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    init_logging(&config.logging)?;
    info!("Starting Fraud Detection Dashboard");
    info!(
        threshold = config.detection.threshold,
        decimals = config.detection.probability_decimals,
        preview_rows = config.display.preview_rows,
        "Configuration loaded"
    );

    // Model must be available before serving anything
    let models = Arc::new(ModelProvider::onnx(&config.model));
    let model = models
        .load()
        .with_context(|| format!("Cannot start without the fraud model at {}", config.model.path))?;
    info!(model = %model.name(), features = FEATURE_COUNT, "Fraud classifier ready");

    let metrics = Arc::new(DashboardMetrics::new());
    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let state = AppState::new(&config, models, metrics.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!("Dashboard listening on http://{}", config.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Dashboard shutting down...");
    metrics.print_summary();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
