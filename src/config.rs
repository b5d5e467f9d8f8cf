//! Configuration management for the form predictor

use crate::forms::FormKind;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default configuration file, used when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config/diabetes.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Which form this process serves
    pub app: FormKind,
    #[serde(default)]
    pub server: ServerConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "127.0.0.1:8501"
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX classifier
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific path.
    ///
    /// Environment variables prefixed `FORM_PREDICTOR__` override file values,
    /// e.g. `FORM_PREDICTOR__SERVER__BIND=0.0.0.0:8080`.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("FORM_PREDICTOR").separator("__"))
            .build()
            .with_context(|| {
                format!("Failed to build configuration from {}", path.as_ref().display())
            })?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Defaults for one form
    pub fn for_form(app: FormKind) -> Self {
        Self {
            app,
            server: ServerConfig::default(),
            model: ModelConfig {
                path: app.default_model_path().to_string(),
                onnx_threads: default_onnx_threads(),
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_form(FormKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.app, FormKind::Diabetes);
        assert_eq!(config.model.path, "models/diabetes.onnx");
        assert_eq!(config.server.bind, "127.0.0.1:8501");
        assert_eq!(config.model.onnx_threads, 1);
    }

    #[test]
    fn test_placement_defaults() {
        let config = AppConfig::for_form(FormKind::Placement);
        assert_eq!(config.model.path, "models/placements.onnx");
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("placement.toml");
        std::fs::write(
            &path,
            r#"
app = "placement"

[model]
path = "models/placements.onnx"

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.app, FormKind::Placement);
        assert_eq!(config.model.path, "models/placements.onnx");
        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(config.server.bind, "127.0.0.1:8501");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from_path(dir.path().join("absent.toml")).is_err());
    }
}
