//! HTTP handlers

use super::error::AppResult;
use super::AppState;
use crate::error::ParseError;
use crate::metrics::MetricsSnapshot;
use crate::types::dataset::{Dataset, TablePreview};
use crate::types::prediction::{ResultRow, SummaryStats};
use crate::validator;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model_path: String,
    model_loaded: bool,
    timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub rows: usize,
    pub columns: usize,
    pub preview: TablePreview,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub results: Vec<ResultRow>,
    pub summary: SummaryStats,
    pub summary_lines: Vec<String>,
    pub threshold: f64,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model_path: state.models.path().display().to_string(),
        model_loaded: state.models.is_loaded(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Parse and schema-check an upload, recording the outcome.
fn accept_upload(state: &AppState, body: &[u8]) -> AppResult<Dataset> {
    let dataset = Dataset::from_bytes(body).map_err(|e: ParseError| {
        state.metrics.record_parse_failure();
        warn!(error = %e, bytes = body.len(), "Rejected unparseable upload");
        e
    })?;

    if let Err(err) = validator::check(dataset.columns()) {
        state.metrics.record_upload(false);
        warn!(missing = ?err.missing, "Rejected upload with missing columns");
        return Err(err.into());
    }
    state.metrics.record_upload(true);

    Ok(dataset)
}

/// Validate an upload and show its first rows.
pub async fn upload(State(state): State<AppState>, body: Bytes) -> AppResult<Json<UploadResponse>> {
    let dataset = accept_upload(&state, &body)?;

    info!(
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "Upload accepted"
    );

    Ok(Json(UploadResponse {
        message: "File uploaded successfully!",
        rows: dataset.len(),
        columns: dataset.columns().len(),
        preview: dataset.head(state.preview_rows),
    }))
}

/// Score every row of an upload.
pub async fn predict(State(state): State<AppState>, body: Bytes) -> AppResult<Json<PredictResponse>> {
    let model = state.models.load()?;
    let dataset = accept_upload(&state, &body)?;

    let pipeline = state.pipeline.clone();
    let started = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || pipeline.run(&dataset, model.as_ref())).await?;

    let report = match outcome {
        Ok(report) => report,
        Err(err) => {
            state.metrics.record_inference_failure();
            return Err(err.into());
        }
    };
    let elapsed = started.elapsed();
    state.metrics.record_prediction(elapsed, &report.results);

    info!(
        total = report.summary.total,
        fraud_count = report.summary.fraud_count,
        elapsed_us = elapsed.as_micros() as u64,
        "Prediction complete"
    );

    let decimals = state.pipeline.decimals();
    Ok(Json(PredictResponse {
        results: report.preview(state.preview_rows, decimals),
        summary: report.summary,
        summary_lines: report.summary_lines(decimals),
        threshold: state.pipeline.threshold(),
    }))
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
