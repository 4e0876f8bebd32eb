//! Process-wide, load-once access to the fraud classifier

use crate::config::ModelConfig;
use crate::error::ModelLoadError;
use crate::models::inference::Classifier;
use crate::models::loader::ModelLoader;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

type LoadFn = dyn Fn(&Path) -> Result<Arc<dyn Classifier>, ModelLoadError> + Send + Sync;

/// Memoizing model provider.
///
/// The first successful `load()` reads the artifact; later calls return the
/// same instance. Racing first callers block until the single load finishes.
/// A failed load leaves the provider empty.
pub struct ModelProvider {
    path: PathBuf,
    loader: Box<LoadFn>,
    model: OnceCell<Arc<dyn Classifier>>,
}

impl ModelProvider {
    /// Provider reading an ONNX artifact as configured.
    pub fn onnx(config: &ModelConfig) -> Self {
        let loader = ModelLoader::with_threads(config.onnx_threads);
        Self::with_loader(&config.path, move |path| {
            let model = loader.load(path)?;
            Ok(Arc::new(model) as Arc<dyn Classifier>)
        })
    }

    /// Provider with a custom load function.
    pub fn with_loader<P, F>(path: P, loader: F) -> Self
    where
        P: Into<PathBuf>,
        F: Fn(&Path) -> Result<Arc<dyn Classifier>, ModelLoadError> + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            loader: Box::new(loader),
            model: OnceCell::new(),
        }
    }

    /// Provider around an already constructed classifier.
    pub fn preloaded(model: Arc<dyn Classifier>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(model);
        Self {
            path: PathBuf::new(),
            loader: Box::new(|path: &Path| {
                Err(ModelLoadError::NotFound {
                    path: path.to_path_buf(),
                })
            }),
            model: cell,
        }
    }

    /// Get the classifier, loading it on first use.
    pub fn load(&self) -> Result<Arc<dyn Classifier>, ModelLoadError> {
        self.model
            .get_or_try_init(|| {
                info!(path = %self.path.display(), "Loading fraud classifier");
                (self.loader)(&self.path)
            })
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InferenceError;
    use crate::feature_extractor::FeatureRow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct ConstantModel(f64);

    impl Classifier for ConstantModel {
        fn name(&self) -> &str {
            "constant"
        }

        fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, InferenceError> {
            Ok(vec![self.0; rows.len()])
        }
    }

    fn counting_provider(loads: Arc<AtomicUsize>) -> ModelProvider {
        ModelProvider::with_loader("best_model.onnx", move |_| {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(ConstantModel(0.3)) as Arc<dyn Classifier>)
        })
    }

    #[test]
    fn test_repeated_load_returns_same_instance() {
        let loads = Arc::new(AtomicUsize::new(0));
        let provider = counting_provider(loads.clone());
        assert!(!provider.is_loaded());

        let first = provider.load().unwrap();
        let second = provider.load().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(provider.is_loaded());
    }

    #[test]
    fn test_concurrent_first_use_loads_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let provider = Arc::new(counting_provider(loads.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let provider = provider.clone();
                thread::spawn(move || provider.load().map(|m| m.name().to_string()))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), "constant");
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_is_reported() {
        let provider = ModelProvider::with_loader("missing.onnx", |path| {
            Err(ModelLoadError::NotFound {
                path: path.to_path_buf(),
            })
        });

        assert!(matches!(provider.load(), Err(ModelLoadError::NotFound { .. })));
        assert!(!provider.is_loaded());
    }

    #[test]
    fn test_onnx_provider_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig {
            path: dir.path().join("best_model.onnx").display().to_string(),
            onnx_threads: 1,
        };

        let provider = ModelProvider::onnx(&config);
        assert!(matches!(provider.load(), Err(ModelLoadError::NotFound { .. })));
    }

    #[test]
    fn test_preloaded() {
        let provider = ModelProvider::preloaded(Arc::new(ConstantModel(0.9)));
        assert!(provider.is_loaded());

        let model = provider.load().unwrap();
        let probs = model.predict_proba(&[FeatureRow::new([0.0; 29])]).unwrap();
        assert_eq!(probs, vec![0.9]);
    }
}
