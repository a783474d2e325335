//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the Catalog-Harvest storefront harvester.

use anyhow::Context;
use catalog_harvest::config::{load_config_with_hash, validate, Config};
use catalog_harvest::output::{print_report, print_snapshot_summary, read_snapshot};
use catalog_harvest::{run_harvest, HarvestMode};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a storefront catalog harvester
///
/// Catalog-Harvest walks a storefront's collection listing, collects every
/// product page link and stores the structured product data embedded in
/// those pages as a JSON snapshot.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version)]
#[command(about = "A storefront catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Pipeline variant to run
    #[arg(short, long, value_enum, default_value_t = HarvestMode::Full)]
    mode: HarvestMode,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long, conflicts_with = "inspect")]
    dry_run: bool,

    /// Read the existing snapshot, print a summary and exit
    #[arg(long, conflicts_with = "dry_run")]
    inspect: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.mode)?;
    } else if cli.inspect {
        handle_inspect(&config)?;
    } else {
        handle_harvest(config, cli.mode, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be harvested
fn handle_dry_run(config: &Config, mode: HarvestMode) -> anyhow::Result<()> {
    validate(config).context("Invalid configuration")?;

    println!("=== Catalog-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Origin: {}", config.site.origin);
    println!("  Listing path: {}", config.site.listing_path);

    println!("\nCrawler:");
    println!("  Mode: {}", mode);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Timeout: {}s", config.crawler.timeout_secs);

    println!("\nSelectors:");
    println!("  Page: {}", config.selectors.page);
    println!("  Page link: {}", config.selectors.page_link);
    println!("  Product link: {}", config.selectors.product_link);
    println!("  Link placeholder: {}", config.selectors.link_placeholder);
    println!("  Structured data: {}", config.selectors.structured_data);

    println!("\nOutput:");
    println!("  Snapshot: {}", config.output.snapshot_path);
    if let Some(failures_path) = &config.output.failures_path {
        println!("  Failure report: {}", failures_path);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --inspect mode: reads back the snapshot
fn handle_inspect(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.snapshot_path);
    println!("Snapshot: {}\n", path.display());

    let snapshot = read_snapshot(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    print_snapshot_summary(&snapshot);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, mode: HarvestMode, quiet: bool) -> anyhow::Result<()> {
    match run_harvest(config, mode).await {
        Ok(report) => {
            tracing::info!("Harvest completed successfully");
            if !quiet {
                print_report(&report);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
