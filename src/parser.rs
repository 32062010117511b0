//! Parser for package.json to extract declared dependency names

use crate::error::{ReportError, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// The parts of `package.json` this tool reads. Version ranges are kept as
/// raw JSON values since only the keys matter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    #[serde(default, deserialize_with = "null_as_empty")]
    dependencies: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    dev_dependencies: BTreeMap<String, Value>,
}

/// `"dependencies": null` reads as an empty map
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<BTreeMap<String, Value>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Read a manifest file and return its dependency names, sorted and unique
pub fn parse_manifest(manifest_path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(manifest_path).map_err(|e| {
        ReportError::manifest(manifest_path.display().to_string(), e.to_string())
    })?;

    parse_manifest_str(&content)
        .map_err(|e| ReportError::manifest(manifest_path.display().to_string(), e.to_string()))
}

/// Extract dependency names from manifest JSON text.
///
/// Runtime and development dependencies are merged by name, dev entries
/// overwriting runtime ones. The map keeps names sorted.
pub fn parse_manifest_str(content: &str) -> std::result::Result<Vec<String>, serde_json::Error> {
    let manifest: PackageManifest = serde_json::from_str(content)?;

    let mut merged = manifest.dependencies;
    merged.extend(manifest.dev_dependencies);

    debug!("Manifest declares {} unique dependencies", merged.len());
    Ok(merged.into_keys().collect())
}
