//! HTTP surface of the dashboard
//!
//! ```text
//! GET  /             upload page
//! GET  /health       liveness + model status
//! POST /api/upload   CSV body → schema check + preview
//! POST /api/predict  CSV body → per-row predictions + summary
//! GET  /api/metrics  counters and latency
//! ```

pub mod error;
pub mod handlers;

use crate::config::AppConfig;
use crate::metrics::DashboardMetrics;
use crate::models::provider::ModelProvider;
use crate::pipeline::InferencePipeline;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub models: Arc<ModelProvider>,
    pub pipeline: InferencePipeline,
    pub metrics: Arc<DashboardMetrics>,
    pub preview_rows: usize,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        models: Arc<ModelProvider>,
        metrics: Arc<DashboardMetrics>,
    ) -> Self {
        Self {
            models,
            pipeline: InferencePipeline::new(&config.detection),
            metrics,
            preview_rows: config.display.preview_rows,
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/upload", post(handlers::upload))
        .route("/api/predict", post(handlers::predict))
        .route("/api/metrics", get(handlers::metrics))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
