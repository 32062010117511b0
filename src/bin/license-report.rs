//! CLI tool for generating the dependency license report

use anyhow::Context;
use clap::Parser;
use colored::*;
use dependency_license_report::{
    generate_report, LicenseReport, ReportConfig, DEFAULT_MANIFEST, DEFAULT_OUTPUT,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "license-report")]
#[command(about = "Check the licenses of package.json dependencies and write a cached markdown report", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the project manifest
    #[arg(short = 'm', long, default_value = DEFAULT_MANIFEST)]
    manifest: PathBuf,

    /// Report file, read as cache and then overwritten
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Structured cache file kept next to the report
    #[arg(long, conflicts_with = "no_cache_file")]
    cache_file: Option<PathBuf>,

    /// Only use the markdown report as cache
    #[arg(long)]
    no_cache_file: bool,

    /// Registry base URL
    #[arg(long)]
    registry: Option<String>,

    /// Maximum number of dependencies processed at once
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Days before a cached entry is fetched again
    #[arg(long)]
    ttl_days: Option<u32>,

    /// Path to custom configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Hide the progress bar
    #[arg(short = 'q', long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        match load_config(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{} Failed to load config: {:#}", "Error:".red().bold(), e);
                process::exit(1);
            }
        }
    } else {
        ReportConfig::default()
    };

    apply_overrides(&cli, &mut config);

    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );
        bar
    };

    let result = generate_report(&config, &progress).await;

    progress.finish_and_clear();

    match result {
        Ok(report) => display_summary(&report, &config.output_path),
        Err(e) => {
            eprintln!("{} Report generation failed: {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: &Path) -> anyhow::Result<ReportConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: ReportConfig = toml::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Command line flags win over the configuration file
fn apply_overrides(cli: &Cli, config: &mut ReportConfig) {
    if cli.config.is_none() || cli.manifest != Path::new(DEFAULT_MANIFEST) {
        config.manifest_path = cli.manifest.clone();
    }
    if cli.config.is_none() || cli.output != Path::new(DEFAULT_OUTPUT) {
        config.output_path = cli.output.clone();
    }
    if cli.no_cache_file {
        config.cache_path = None;
    } else if let Some(cache_file) = &cli.cache_file {
        config.cache_path = Some(cache_file.clone());
    }
    if let Some(registry) = &cli.registry {
        config.network.registry_url = registry.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.network.concurrency = concurrency;
    }
    if let Some(ttl_days) = cli.ttl_days {
        config.cache_ttl_days = ttl_days;
    }
}

fn display_summary(report: &LicenseReport, output_path: &Path) {
    println!("\n{}", "=== License Report ===".bold());
    println!("Report: {}", output_path.display().to_string().cyan());
    println!("Total dependencies: {}", report.summary.total_dependencies);
    println!("Reused from cache: {}", report.summary.cached);

    if report.summary.non_permissive == 0 {
        println!("{} All licenses are permissive", "●".green());
        return;
    }

    println!(
        "{} {}",
        "●".red(),
        format!("Non-permissive licenses: {}", report.summary.non_permissive).red()
    );
    for record in report.non_permissive() {
        let license = record.license_link.as_deref().unwrap_or("no license information");
        println!("  - {} ({})", record.name.bold(), license.yellow());
    }
}
