//! Feature extraction for fraud model inference.
//!
//! Maps uploaded CSV columns onto the 29 model features by header name,
//! so the column order in the file is irrelevant and extra columns are
//! ignored.

use crate::error::{InferenceError, SchemaError};
use crate::types::dataset::Dataset;
use crate::validator;
use csv::StringRecord;

/// Number of features the classifier expects.
pub const FEATURE_COUNT: usize = 29;

/// Required feature columns, in the order the model was trained on.
pub const REQUIRED_COLUMNS: [&str; FEATURE_COUNT] = [
    "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12", "V13", "V14",
    "V15", "V16", "V17", "V18", "V19", "V20", "V21", "V22", "V23", "V24", "V25", "V26", "V27",
    "V28", "Amount",
];

/// One transaction's features in canonical order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    values: [f32; FEATURE_COUNT],
}

impl FeatureRow {
    pub fn new(values: [f32; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Feature values in `REQUIRED_COLUMNS` order.
    pub fn values(&self) -> &[f32; FEATURE_COUNT] {
        &self.values
    }

    /// Look up a feature by column name.
    pub fn get(&self, name: &str) -> Option<f32> {
        REQUIRED_COLUMNS
            .iter()
            .position(|&col| col == name)
            .map(|idx| self.values[idx])
    }

    /// Transaction amount
    pub fn amount(&self) -> f32 {
        self.values[FEATURE_COUNT - 1]
    }
}

/// Extracts `FeatureRow`s from a dataset whose header has been validated.
///
/// Holds, for every required feature, the index of the source column.
/// When a header name repeats, the first occurrence wins.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    indices: [usize; FEATURE_COUNT],
}

impl FeatureExtractor {
    /// Build an extractor for the given header, failing if any required column is missing.
    pub fn for_columns<S: AsRef<str>>(columns: &[S]) -> Result<Self, SchemaError> {
        validator::check(columns)?;

        let mut indices = [0usize; FEATURE_COUNT];
        for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS.iter()) {
            // check() guarantees presence
            *slot = columns
                .iter()
                .position(|col| col.as_ref() == *name)
                .unwrap_or_default();
        }

        Ok(Self { indices })
    }

    /// Extract one row. `row` is the zero-based data row index, used in errors.
    ///
    /// Empty cells become NaN, matching how missing values reach the model.
    pub fn extract_row(&self, row: usize, record: &StringRecord) -> Result<FeatureRow, InferenceError> {
        let mut values = [0f32; FEATURE_COUNT];

        for (i, &col_idx) in self.indices.iter().enumerate() {
            let raw = record.get(col_idx).unwrap_or("").trim();
            values[i] = if raw.is_empty() {
                f32::NAN
            } else {
                raw.parse::<f32>().map_err(|_| InferenceError::NonNumeric {
                    row,
                    column: REQUIRED_COLUMNS[i],
                    value: raw.to_string(),
                })?
            };
        }

        Ok(FeatureRow::new(values))
    }

    /// Extract every row of the dataset, preserving order.
    pub fn extract(&self, dataset: &Dataset) -> Result<Vec<FeatureRow>, InferenceError> {
        dataset
            .records()
            .iter()
            .enumerate()
            .map(|(row, record)| self.extract_row(row, record))
            .collect()
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names in model order.
    pub fn feature_names(&self) -> &'static [&'static str] {
        &REQUIRED_COLUMNS
    }
}
