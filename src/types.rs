//! Core data types for license reporting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete license report for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseReport {
    /// Timestamp when the report was generated
    pub generated_at: DateTime<Utc>,
    /// One record per declared dependency, sorted by name
    pub records: Vec<ReportRecord>,
    /// Summary statistics
    pub summary: ReportSummary,
}

/// Summary statistics for a license report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_dependencies: usize,
    pub non_permissive: usize,
    /// Records reused from the cache without a registry call
    pub cached: usize,
}

/// Final per-dependency entry written to the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Package name
    pub name: String,
    /// Whether the license matched the permissive allow-list
    pub is_permissive: bool,
    /// Description, already defaulted to a placeholder when missing
    pub description: String,
    /// Link to the package page on the registry website
    pub registry_link: String,
    /// Link to the license text, absent when no license was reported
    pub license_link: Option<String>,
    /// When the metadata was fetched, kept verbatim from the cache
    pub last_updated: String,
    /// Whether this record was reused from the cache
    #[serde(skip)]
    pub from_cache: bool,
}

/// Metadata recovered from a previous run.
///
/// The license string itself is not retained, only the derived link and
/// the permissive flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedRecord {
    pub name: String,
    pub registry_link: String,
    pub license_link: Option<String>,
    pub description: String,
    pub is_permissive: bool,
    pub last_updated: String,
}

impl From<&ReportRecord> for CachedRecord {
    fn from(record: &ReportRecord) -> Self {
        Self {
            name: record.name.clone(),
            registry_link: record.registry_link.clone(),
            license_link: record.license_link.clone(),
            description: record.description.clone(),
            is_permissive: record.is_permissive,
            last_updated: record.last_updated.clone(),
        }
    }
}

impl From<CachedRecord> for ReportRecord {
    fn from(cached: CachedRecord) -> Self {
        Self {
            name: cached.name,
            is_permissive: cached.is_permissive,
            description: cached.description,
            registry_link: cached.registry_link,
            license_link: cached.license_link,
            last_updated: cached.last_updated,
            from_cache: true,
        }
    }
}

impl LicenseReport {
    /// Create a report from ordered records and compute its summary
    pub fn new(generated_at: DateTime<Utc>, records: Vec<ReportRecord>) -> Self {
        let mut report = Self {
            generated_at,
            records,
            summary: ReportSummary::default(),
        };
        report.compute_summary();
        report
    }

    /// Compute summary statistics from records
    pub fn compute_summary(&mut self) {
        self.summary = ReportSummary {
            total_dependencies: self.records.len(),
            non_permissive: self.records.iter().filter(|r| !r.is_permissive).count(),
            cached: self.records.iter().filter(|r| r.from_cache).count(),
        };
    }

    /// Records whose license needs review
    pub fn non_permissive(&self) -> impl Iterator<Item = &ReportRecord> {
        self.records.iter().filter(|r| !r.is_permissive)
    }
}
