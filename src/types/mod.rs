//! Type definitions for the fraud detection dashboard

pub mod dataset;
pub mod prediction;

pub use dataset::Dataset;
pub use prediction::{PredictionReport, PredictionResult, ResultRow, SummaryStats};
