//! Batch inference against the fraud classifier

use crate::error::InferenceError;
use crate::feature_extractor::{FeatureRow, FEATURE_COUNT};
use ort::memory::Allocator;
use ort::session::{Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// A binary classifier scoring transactions for fraud.
///
/// Implementations must return exactly one positive-class probability per
/// input row, in input order.
pub trait Classifier: Send + Sync {
    /// Human readable model identifier
    fn name(&self) -> &str;

    /// Probability of the fraud class for every row.
    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, InferenceError>;
}

/// Classifier backed by an ONNX Runtime session.
pub struct OnnxClassifier {
    name: String,
    /// `Session::run` needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    pub fn new(name: String, session: Session, input_name: String, output_name: String) -> Self {
        Self {
            name,
            session: Mutex::new(session),
            input_name,
            output_name,
        }
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, InferenceError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // Input tensor - shape [rows, 29], row-major
        let shape = vec![rows.len() as i64, FEATURE_COUNT as i64];
        let data: Vec<f32> = rows.iter().flat_map(|r| r.values().iter().copied()).collect();
        let input_tensor = Tensor::from_array((shape, data))
            .map_err(|e| InferenceError::Runtime(format!("failed to create input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::Runtime(format!("session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .map_err(|e| InferenceError::Runtime(e.to_string()))?;

        let probabilities = extract_probabilities(&outputs, &self.output_name, rows.len())?;

        debug!(model = %self.name, rows = rows.len(), "Batch inference complete");

        normalize_probabilities(probabilities, rows.len())
    }
}

/// Pull the fraud-class probabilities out of the session outputs.
///
/// Handles tensor outputs (`[n, 2]`, `[n, 1]`, `[n]`) and the
/// `seq(map(int64, float))` layout produced by zipmap-style exports.
fn extract_probabilities(
    outputs: &SessionOutputs,
    output_name: &str,
    rows: usize,
) -> Result<Vec<f64>, InferenceError> {
    if let Some(output) = outputs.get(output_name) {
        if let Some(probabilities) = probabilities_from_value(output, rows)? {
            return Ok(probabilities);
        }
    }

    // Fallback: any other output that isn't the label
    for (name, output) in outputs.iter() {
        if name == output_name || name.contains("label") {
            continue;
        }
        if let Some(probabilities) = probabilities_from_value(&output, rows)? {
            debug!(output = %name, "Extracted probabilities from fallback output");
            return Ok(probabilities);
        }
    }

    Err(InferenceError::Output(
        "no output carries class probabilities".to_string(),
    ))
}

/// `Ok(None)` when the value has a layout we don't read probabilities from.
fn probabilities_from_value(
    output: &DynValue,
    rows: usize,
) -> Result<Option<Vec<f64>>, InferenceError> {
    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        return positive_class_column(&dims, data, rows).map(Some);
    }

    let dtype = output.dtype();
    if DynSequenceValueType::can_downcast(&dtype) {
        return positive_class_from_sequence(output).map(Some);
    }

    Ok(None)
}

/// Positive-class probabilities from a dense tensor.
fn positive_class_column(dims: &[i64], data: &[f32], rows: usize) -> Result<Vec<f64>, InferenceError> {
    let mismatch = || InferenceError::Output(format!("tensor shape {dims:?} does not match {rows} rows"));

    match *dims {
        [n, classes] if n as usize == rows && classes >= 2 => {
            let classes = classes as usize;
            Ok((0..rows).map(|i| data[i * classes + 1] as f64).collect())
        }
        [n, 1] if n as usize == rows => Ok(data.iter().take(rows).map(|&p| p as f64).collect()),
        [n] if n as usize == rows => Ok(data.iter().take(rows).map(|&p| p as f64).collect()),
        _ => Err(mismatch()),
    }
}

/// Positive-class probabilities from a `seq(map(int64, float))` value, one map per row.
fn positive_class_from_sequence(output: &DynValue) -> Result<Vec<f64>, InferenceError> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| InferenceError::Output(format!("failed to downcast to sequence: {e}")))?;

    let maps = sequence
        .try_extract_sequence::<DynMapValueType>(&allocator)
        .map_err(|e| InferenceError::Output(e.to_string()))?;

    maps.iter()
        .map(|map_value| {
            let kv_pairs = map_value
                .try_extract_key_values::<i64, f32>()
                .map_err(|e| InferenceError::Output(e.to_string()))?;
            positive_class_from_pairs(&kv_pairs)
        })
        .collect()
}

fn positive_class_from_pairs(kv_pairs: &[(i64, f32)]) -> Result<f64, InferenceError> {
    if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 1) {
        return Ok(*prob as f64);
    }
    // Only the negative class was emitted
    if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 0) {
        return Ok(1.0 - *prob as f64);
    }
    Err(InferenceError::Output("no probability found in map".to_string()))
}

/// Enforce one finite probability per row, clamped into [0, 1].
pub(crate) fn normalize_probabilities(
    probabilities: Vec<f64>,
    rows: usize,
) -> Result<Vec<f64>, InferenceError> {
    if probabilities.len() != rows {
        return Err(InferenceError::Output(format!(
            "model returned {} probabilities for {} rows",
            probabilities.len(),
            rows
        )));
    }

    probabilities
        .into_iter()
        .enumerate()
        .map(|(row, p)| {
            if p.is_finite() {
                Ok(p.clamp(0.0, 1.0))
            } else {
                Err(InferenceError::Output(format!("row {row}: probability is {p}")))
            }
        })
        .collect()
}
