//! Upload → validate → predict → summarize

use crate::config::DetectionConfig;
use crate::error::{DashboardError, InferenceError};
use crate::feature_extractor::{FeatureExtractor, FeatureRow};
use crate::models::inference::Classifier;
use crate::types::dataset::Dataset;
use crate::types::prediction::{PredictionReport, PredictionResult, SummaryStats};
use tracing::debug;

/// Batch inference with a fixed decision threshold.
#[derive(Debug, Clone)]
pub struct InferencePipeline {
    threshold: f64,
    decimals: u32,
}

impl InferencePipeline {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            threshold: config.threshold,
            decimals: config.probability_decimals,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decimal places used when displaying probabilities
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Score already-extracted rows.
    ///
    /// Labels compare the unrounded probability against the threshold
    /// (inclusive). An empty batch never reaches the model.
    pub fn infer(
        &self,
        rows: &[FeatureRow],
        model: &dyn Classifier,
    ) -> Result<(Vec<PredictionResult>, SummaryStats), InferenceError> {
        let probabilities = if rows.is_empty() {
            Vec::new()
        } else {
            model.predict_proba(rows)?
        };

        if probabilities.len() != rows.len() {
            return Err(InferenceError::Output(format!(
                "model {} returned {} probabilities for {} rows",
                model.name(),
                probabilities.len(),
                rows.len()
            )));
        }

        let results: Vec<PredictionResult> = probabilities
            .into_iter()
            .map(|p| PredictionResult::from_probability(p, self.threshold))
            .collect();
        let summary = SummaryStats::from_results(&results);

        debug!(
            model = %model.name(),
            total = summary.total,
            fraud_count = summary.fraud_count,
            "Batch scored"
        );

        Ok((results, summary))
    }

    /// Validate the upload's columns, extract features and score every row.
    ///
    /// Schema failures stop before the model is consulted.
    pub fn run(
        &self,
        dataset: &Dataset,
        model: &dyn Classifier,
    ) -> Result<PredictionReport, DashboardError> {
        let extractor = FeatureExtractor::for_columns(dataset.columns())?;
        let rows = extractor.extract(dataset)?;
        let (results, summary) = self.infer(&rows, model)?;

        Ok(PredictionReport { results, summary })
    }
}

impl Default for InferencePipeline {
    fn default() -> Self {
        Self::new(&DetectionConfig::default())
    }
}
