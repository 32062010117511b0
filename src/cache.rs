//! Reading and writing the metadata cache.
//!
//! Two sources feed the cache: the structured cache file written next to
//! the report, and the previous markdown report itself. When both hold an
//! entry for the same package the more recently updated one is kept, ties
//! going to the structured file. Every read failure degrades to an empty
//! cache.

use crate::config::ReportConfig;
use crate::error::Result;
use crate::report::{
    DESCRIPTION_LABEL, ENTRY_MARKER, LICENSE_LABEL, NO_LICENSE, REGISTRY_LABEL, UPDATED_LABEL,
    WARNING_GLYPH,
};
use crate::timestamp::cached_at;
use crate::types::{CachedRecord, ReportRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

const CACHE_FORMAT_VERSION: u32 = 1;

/// Cached metadata keyed by package name
pub type CacheMap = HashMap<String, CachedRecord>;

/// On-disk layout of the structured cache file
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    records: BTreeMap<String, CachedRecord>,
}

/// Load every cache source named by the configuration
pub fn load_cache(config: &ReportConfig) -> CacheMap {
    let mut cache = load_report_cache(&config.output_path);

    if let Some(cache_path) = &config.cache_path {
        let structured = load_cache_file(cache_path);
        debug!(
            "Merging {} structured entries over {} report entries",
            structured.len(),
            cache.len()
        );
        merge_newer(&mut cache, structured);
    }

    info!("Loaded {} cached entries", cache.len());
    cache
}

/// Merge `incoming` into `cache`, keeping the entry with the later timestamp
fn merge_newer(cache: &mut CacheMap, incoming: CacheMap) {
    for (name, record) in incoming {
        match cache.get(&name) {
            Some(existing) if cached_at(&existing.last_updated) > cached_at(&record.last_updated) => {
                debug!("Keeping newer report entry for {}", name);
            }
            _ => {
                cache.insert(name, record);
            }
        }
    }
}

/// Parse the previous report at `path`, empty when missing or unreadable
pub fn load_report_cache(path: &Path) -> CacheMap {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_report(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No previous report at {}", path.display());
            CacheMap::new()
        }
        Err(e) => {
            warn!("Could not read previous report {}: {}", path.display(), e);
            CacheMap::new()
        }
    }
}

/// Recover cached records from a rendered report.
///
/// The document is split on the entry marker and each block's first five
/// lines are read by position. Blocks that do not match the layout are
/// skipped.
pub fn parse_report(content: &str) -> CacheMap {
    content
        .split(ENTRY_MARKER)
        .skip(1)
        .filter_map(|block| {
            let record = parse_block(block);
            if record.is_none() {
                debug!("Skipping malformed report block: {:?}", block.lines().next());
            }
            record
        })
        .map(|record| (record.name.clone(), record))
        .collect()
}

fn parse_block(block: &str) -> Option<CachedRecord> {
    let mut lines = block.lines();

    let title = lines.next()?.trim_end();
    let (name, is_permissive) = match title.strip_prefix(WARNING_GLYPH) {
        Some(name) => (name, false),
        None => (title, true),
    };
    if name.is_empty() {
        return None;
    }

    let description = lines.next()?.strip_prefix(DESCRIPTION_LABEL)?;
    let registry_link = lines.next()?.strip_prefix(REGISTRY_LABEL)?;
    let license = lines.next()?.strip_prefix(LICENSE_LABEL)?;
    let last_updated = lines.next()?.strip_prefix(UPDATED_LABEL)?;

    Some(CachedRecord {
        name: name.to_string(),
        registry_link: registry_link.to_string(),
        license_link: (license != NO_LICENSE).then(|| license.to_string()),
        description: description.to_string(),
        is_permissive,
        last_updated: last_updated.trim_end().to_string(),
    })
}

/// Read the structured cache file, empty when missing, unreadable or from
/// another format version
pub fn load_cache_file(path: &Path) -> CacheMap {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No cache file at {}", path.display());
            return CacheMap::new();
        }
        Err(e) => {
            warn!("Could not read cache file {}: {}", path.display(), e);
            return CacheMap::new();
        }
    };

    match serde_json::from_str::<CacheFile>(&content) {
        Ok(file) if file.version == CACHE_FORMAT_VERSION => file.records.into_iter().collect(),
        Ok(file) => {
            warn!(
                "Ignoring cache file {} with unsupported version {}",
                path.display(),
                file.version
            );
            CacheMap::new()
        }
        Err(e) => {
            warn!("Ignoring corrupt cache file {}: {}", path.display(), e);
            CacheMap::new()
        }
    }
}

/// Persist the records of this run as the structured cache file
pub fn write_cache_file(path: &Path, records: &[ReportRecord]) -> Result<()> {
    let file = CacheFile {
        version: CACHE_FORMAT_VERSION,
        records: records
            .iter()
            .map(|record| (record.name.clone(), CachedRecord::from(record)))
            .collect(),
    };

    std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
    debug!("Wrote {} entries to {}", records.len(), path.display());
    Ok(())
}
