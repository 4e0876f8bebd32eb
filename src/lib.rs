//! Fraud Detection Dashboard Library
//!
//! Upload a CSV of transaction features, score every row with a
//! pre-trained ONNX classifier and summarize the predictions.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod types;
pub mod validator;

pub use config::AppConfig;
pub use error::{DashboardError, InferenceError, ModelLoadError, ParseError, SchemaError};
pub use feature_extractor::{FeatureExtractor, FeatureRow, FEATURE_COUNT, REQUIRED_COLUMNS};
pub use models::{Classifier, ModelProvider};
pub use pipeline::InferencePipeline;
pub use types::{Dataset, PredictionReport, PredictionResult, SummaryStats};
