//! Error types for report generation

use thiserror::Error;

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Main error type for report generation.
///
/// Only run-level failures end up here. Per-dependency problems (registry
/// outages, stale or corrupt cache entries) are logged and degraded inside
/// the pipeline instead of being returned.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read manifest {path}: {message}")]
    ManifestError { path: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

impl ReportError {
    /// Create a manifest error
    pub fn manifest(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ManifestError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
