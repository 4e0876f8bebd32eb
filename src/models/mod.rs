//! Fraud classifier loading and inference

pub mod inference;
pub mod loader;
pub mod provider;

pub use inference::{Classifier, OnnxClassifier};
pub use loader::ModelLoader;
pub use provider::ModelProvider;
