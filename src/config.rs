//! Configuration management for the fraud detection dashboard

use anyhow::{ensure, Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub detection: DetectionConfig,
    pub display: DisplayConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. "0.0.0.0:8501"
    pub bind_addr: String,
    /// Largest accepted upload body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    200 * 1024 * 1024
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX classifier, relative to the working directory
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Detection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Probability at or above which a row is labelled fraud
    pub threshold: f64,
    /// Decimal places shown for probabilities
    #[serde(default = "default_probability_decimals")]
    pub probability_decimals: u32,
}

fn default_probability_decimals() -> u32 {
    4
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            probability_decimals: default_probability_decimals(),
        }
    }
}

/// Result display configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Rows shown in upload and result previews
    pub preview_rows: usize,
}

/// Metrics reporting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between periodic summaries (0 disables the reporter)
    pub report_interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: 300,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot honour
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.detection.threshold),
            "detection.threshold must be within [0, 1], got {}",
            self.detection.threshold
        );
        ensure!(
            self.detection.probability_decimals <= 10,
            "detection.probability_decimals must be at most 10, got {}",
            self.detection.probability_decimals
        );
        ensure!(
            self.display.preview_rows > 0,
            "display.preview_rows must be positive"
        );
        ensure!(
            matches!(self.logging.format.as_str(), "json" | "pretty"),
            "logging.format must be \"json\" or \"pretty\", got {:?}",
            self.logging.format
        );
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "0.0.0.0:8501".to_string(),
                max_upload_bytes: default_max_upload_bytes(),
            },
            model: ModelConfig {
                path: "best_model.onnx".to_string(),
                onnx_threads: 1,
            },
            detection: DetectionConfig::default(),
            display: DisplayConfig { preview_rows: 5 },
            metrics: MetricsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
