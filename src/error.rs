//! Error taxonomy for the dashboard pipeline

use std::path::PathBuf;
use thiserror::Error;

/// User-facing rejection shown when an upload lacks required columns.
pub const SCHEMA_REJECTION: &str =
    "Uploaded CSV must contain exactly 29 features: V1–V28 and Amount.";

/// Uploaded data is missing one or more required feature columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} Missing: {}", SCHEMA_REJECTION, .missing.join(", "))]
pub struct SchemaError {
    /// Missing column names, in canonical feature order
    pub missing: Vec<String>,
}

/// Uploaded bytes could not be read as a rectangular CSV table.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("uploaded file is empty")]
    Empty,

    #[error("uploaded file is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// The model artifact could not be loaded.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model artifact not found at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to load model from {}: {reason}", .path.display())]
    Session { path: PathBuf, reason: String },

    #[error("model at {} has an unusable signature: {reason}", .path.display())]
    Signature { path: PathBuf, reason: String },
}

/// The model rejected the batch at prediction time.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("row {row}: column {column} has non-numeric value {value:?}")]
    NonNumeric {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("model runtime error: {0}")]
    Runtime(String),

    #[error("unexpected model output: {0}")]
    Output(String),
}

impl InferenceError {
    /// Whether the failure is caused by the uploaded data rather than the runtime.
    pub fn is_input_error(&self) -> bool {
        matches!(self, InferenceError::NonNumeric { .. })
    }
}

/// Any failure of a single upload/predict request.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}
