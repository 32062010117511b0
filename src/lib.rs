//! # dependency_license_report
//!
//! Generate a license report for the dependencies declared in a
//! `package.json`:
//! - **Registry lookup**: license and description for every dependency,
//!   fetched with bounded concurrency
//! - **License classification**: permissive allow-list, failing closed on
//!   unknown or missing licenses
//! - **Time-boxed cache**: entries from the previous report are reused for
//!   a week, so repeated runs (pre-commit hooks) stay offline
//!
//! ## Quick Start
//!
//! ```no_run
//! use dependency_license_report::{generate_report, ReportConfig};
//! use indicatif::ProgressBar;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = ReportConfig::default();
//! let report = generate_report(&config, &ProgressBar::hidden()).await?;
//!
//! for record in report.non_permissive() {
//!     println!("review needed: {}", record.name);
//! }
//! # Ok(())
//! # }
//! ```

mod audit;
mod cache;
mod config;
mod error;
mod license;
mod metadata;
mod parser;
mod report;
mod timestamp;
mod types;

// Re-export public API
pub use audit::{audit_dependencies, generate_report};
pub use cache::{load_cache, load_cache_file, load_report_cache, parse_report, write_cache_file, CacheMap};
pub use config::{
    NetworkConfig, ReportConfig, ReportConfigBuilder, DEFAULT_CACHE_FILE, DEFAULT_MANIFEST, DEFAULT_OUTPUT,
    DEFAULT_REGISTRY,
};
pub use error::{ReportError, Result};
pub use license::{is_permissive, license_link};
pub use metadata::{registry_link, PackageMetadata, RegistryClient};
pub use parser::{parse_manifest, parse_manifest_str};
pub use report::{render_markdown, NO_DESCRIPTION, NO_LICENSE};
pub use timestamp::{format_timestamp, is_fresh, parse_timestamp};
pub use types::{CachedRecord, LicenseReport, ReportRecord, ReportSummary};
