//! Configuration for report generation and registry access

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default manifest file name, looked up in the working directory
pub const DEFAULT_MANIFEST: &str = "package.json";
/// Default report file name; doubles as the cache input
pub const DEFAULT_OUTPUT: &str = "DEPENDENCY_LICENSES.md";
/// Default structured cache file name
pub const DEFAULT_CACHE_FILE: &str = ".dependency-licenses.json";
/// Default npm registry
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Main configuration for a report run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Path to the project manifest (`package.json`)
    pub manifest_path: PathBuf,
    /// Path to the markdown report, read as cache and then overwritten
    pub output_path: PathBuf,
    /// Structured cache file written next to the report (`None` disables it)
    pub cache_path: Option<PathBuf>,
    /// Cached entries older than this are re-fetched
    pub cache_ttl_days: u32,
    /// Network configuration
    pub network: NetworkConfig,
}

/// Network configuration for registry calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Registry base URL, package names are appended as a single path segment
    pub registry_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of dependencies processed at the same time
    pub concurrency: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            cache_path: Some(PathBuf::from(DEFAULT_CACHE_FILE)),
            cache_ttl_days: 7,
            network: NetworkConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY.to_string(),
            timeout_secs: 30,
            concurrency: 10,
        }
    }
}

impl NetworkConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ReportConfig {
    /// Create a new builder for ReportConfig
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Cache lifetime as a chrono duration
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.cache_ttl_days))
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.network.concurrency == 0 {
            return Err(ReportError::config("concurrency must be at least 1"));
        }
        if self.network.registry_url.trim().is_empty() {
            return Err(ReportError::config("registry URL must not be empty"));
        }
        Ok(())
    }
}

/// Builder for ReportConfig
#[derive(Default)]
pub struct ReportConfigBuilder {
    manifest_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    cache_path: Option<Option<PathBuf>>,
    cache_ttl_days: Option<u32>,
    network: Option<NetworkConfig>,
}

impl ReportConfigBuilder {
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn cache_path(mut self, path: Option<PathBuf>) -> Self {
        self.cache_path = Some(path);
        self
    }

    pub fn cache_ttl_days(mut self, days: u32) -> Self {
        self.cache_ttl_days = Some(days);
        self
    }

    pub fn network(mut self, network: NetworkConfig) -> Self {
        self.network = Some(network);
        self
    }

    pub fn build(self) -> ReportConfig {
        let defaults = ReportConfig::default();
        ReportConfig {
            manifest_path: self.manifest_path.unwrap_or(defaults.manifest_path),
            output_path: self.output_path.unwrap_or(defaults.output_path),
            cache_path: self.cache_path.unwrap_or(defaults.cache_path),
            cache_ttl_days: self.cache_ttl_days.unwrap_or(defaults.cache_ttl_days),
            network: self.network.unwrap_or_default(),
        }
    }
}
