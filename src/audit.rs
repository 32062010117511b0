//! Main report orchestration: cache decisions, bounded fetching, output

use crate::cache::{load_cache, write_cache_file, CacheMap};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::license::{is_permissive, license_link};
use crate::metadata::{registry_link, PackageMetadata, RegistryClient};
use crate::parser::parse_manifest;
use crate::report::{display_description, render_markdown};
use crate::timestamp::{format_timestamp, is_fresh};
use crate::types::{CachedRecord, LicenseReport, ReportRecord};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Generate the license report described by `config` and write it out.
///
/// Only a missing or malformed manifest, an invalid configuration or a
/// failed write abort the run. Registry and cache problems degrade per
/// dependency.
pub async fn generate_report(config: &ReportConfig, progress: &ProgressBar) -> Result<LicenseReport> {
    config.validate()?;
    info!("Reading manifest at: {}", config.manifest_path.display());

    let dependencies = parse_manifest(&config.manifest_path)?;
    info!("Found {} dependencies", dependencies.len());

    let cache = load_cache(config);
    let client = RegistryClient::new(&config.network)?;

    let report = audit_dependencies(dependencies, &cache, client, config, Utc::now(), progress).await;

    std::fs::write(&config.output_path, render_markdown(&report))?;
    if let Some(cache_path) = &config.cache_path {
        write_cache_file(cache_path, &report.records)?;
    }

    info!(
        "Report written to {}: {} dependencies, {} non-permissive, {} from cache",
        config.output_path.display(),
        report.summary.total_dependencies,
        report.summary.non_permissive,
        report.summary.cached,
    );

    Ok(report)
}

/// Resolve one record per dependency, reusing fresh cache entries and
/// fetching the rest with at most `config.network.concurrency` units in
/// flight. Records come back sorted by name whatever the completion order.
pub async fn audit_dependencies(
    dependencies: Vec<String>,
    cache: &CacheMap,
    client: RegistryClient,
    config: &ReportConfig,
    now: DateTime<Utc>,
    progress: &ProgressBar,
) -> LicenseReport {
    let client = Arc::new(client);
    let semaphore = Arc::new(Semaphore::new(config.network.concurrency.max(1)));
    let ttl = config.cache_ttl();

    progress.set_length(dependencies.len() as u64);

    let mut tasks = Vec::with_capacity(dependencies.len());

    for name in dependencies {
        let cached = cache
            .get(&name)
            .filter(|entry| is_fresh(&entry.last_updated, now, ttl))
            .cloned();
        let client = Arc::clone(&client);
        let semaphore = Arc::clone(&semaphore);
        let progress = progress.clone();
        let task_name = name.clone();

        let task = tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore shouldn't have been closed this soon");

            let record = process_dependency(task_name, cached, &client, now).await;

            progress.set_message(record.name.clone());
            progress.inc(1);
            record
        });

        tasks.push((name, task));
    }

    // Collect results
    let mut records = Vec::with_capacity(tasks.len());
    for (name, task) in tasks {
        match task.await {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Task for {} failed: {}", name, e);
                progress.inc(1);
                records.push(fresh_record(name, PackageMetadata::default(), now));
            }
        }
    }

    records.sort_by(|a, b| a.name.cmp(&b.name));
    LicenseReport::new(now, records)
}

/// Process a single dependency
async fn process_dependency(
    name: String,
    cached: Option<CachedRecord>,
    client: &RegistryClient,
    now: DateTime<Utc>,
) -> ReportRecord {
    if let Some(cached) = cached {
        debug!("Using cached metadata for {} ({})", name, cached.last_updated);
        return ReportRecord::from(cached);
    }

    debug!("Fetching metadata for {}", name);
    let metadata = client.fetch_package_metadata(&name).await;
    fresh_record(name, metadata, now)
}

/// Build a record from freshly fetched metadata
fn fresh_record(name: String, metadata: PackageMetadata, now: DateTime<Utc>) -> ReportRecord {
    let license = metadata.license.as_deref();

    ReportRecord {
        is_permissive: is_permissive(license),
        description: display_description(metadata.description.as_deref()),
        registry_link: registry_link(&name),
        license_link: license_link(license),
        last_updated: format_timestamp(now),
        from_cache: false,
        name,
    }
}
