//! ONNX model loader

use crate::error::ModelLoadError;
use crate::models::inference::OnnxClassifier;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Loader for the serialized fraud classifier
#[derive(Debug, Clone)]
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a model loader with the given intra-op thread count
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier from an ONNX file.
    ///
    /// Picks the first graph input as the feature tensor and prefers an
    /// output whose name mentions probabilities.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<OnnxClassifier, ModelLoadError> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(ModelLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()
            .map_err(|e| session_error(path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| session_error(path, e))?
            .with_intra_threads(self.onnx_threads)
            .map_err(|e| session_error(path, e))?
            .commit_from_file(path)
            .map_err(|e| session_error(path, e))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| ModelLoadError::Signature {
                path: path.to_path_buf(),
                reason: "graph has no inputs".to_string(),
            })?;

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelLoadError::Signature {
                path: path.to_path_buf(),
                reason: "graph has no outputs".to_string(),
            })?;

        info!(
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(OnnxClassifier::new(
            path.display().to_string(),
            session,
            input_name,
            output_name,
        ))
    }
}

fn session_error(path: &Path, e: impl fmt::Display) -> ModelLoadError {
    ModelLoadError::Session {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self { onnx_threads: 1 }
    }
}
