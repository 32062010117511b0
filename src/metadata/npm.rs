//! Fetch package metadata from an npm-compatible registry

use crate::config::NetworkConfig;
use crate::error::{ReportError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const NPM_WEBSITE: &str = "https://www.npmjs.com/package";
const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION")
);

/// License and description reported by the registry for a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub license: Option<String>,
    pub description: Option<String>,
}

/// Response from the registry's package document. Only the fields this
/// tool reads are declared.
#[derive(Debug, Deserialize)]
struct PackageDocument {
    #[serde(default)]
    license: Option<LicenseField>,
    #[serde(default)]
    description: Option<String>,
}

/// Old packages publish `{ "type": "MIT", "url": ... }` instead of a string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LicenseField {
    Text(String),
    Object {
        #[serde(rename = "type")]
        kind: Option<String>,
    },
    Other(serde::de::IgnoredAny),
}

impl LicenseField {
    fn into_license(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Object { kind } => kind,
            Self::Other(_) => None,
        }
    }
}

/// Registry client. One GET per package, no retries.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    client: Client,
    registry_url: String,
}

impl RegistryClient {
    /// Build a client for the configured registry
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ReportError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            registry_url: config.registry_url.trim_end_matches('/').to_string(),
        })
    }

    /// Registry document URL for a package
    pub fn package_url(&self, name: &str) -> String {
        format!("{}/{}", self.registry_url, encode_package_name(name))
    }

    /// Fetch metadata for a package.
    ///
    /// Best effort: any failure is logged and yields empty metadata so one
    /// broken package never aborts the run.
    pub async fn fetch_package_metadata(&self, name: &str) -> PackageMetadata {
        match self.try_fetch(name).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Failed to fetch registry metadata for {}: {}", name, e);
                PackageMetadata::default()
            }
        }
    }

    async fn try_fetch(&self, name: &str) -> Result<PackageMetadata> {
        let url = self.package_url(name);
        debug!("Fetching metadata for {} from {}", name, url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?;

        let document: PackageDocument = response.json().await?;

        Ok(PackageMetadata {
            license: document.license.and_then(LicenseField::into_license),
            description: document.description,
        })
    }
}

/// Package page on the npm website
pub fn registry_link(name: &str) -> String {
    format!("{}/{}", NPM_WEBSITE, name)
}

/// Encode a package name as one path segment; `@scope/pkg` keeps its `@`
fn encode_package_name(name: &str) -> String {
    match name.strip_prefix('@') {
        Some(scoped) => format!("@{}", urlencoding::encode(scoped)),
        None => urlencoding::encode(name).into_owned(),
    }
}
