//! Harvest pipeline - end-to-end run orchestration
//!
//! A run is a straight sequence of stages, each finishing before the next
//! starts:
//! 1. Page discovery on the collection listing
//! 2. Product link extraction on every collection page
//! 3. Product detail fetching (full mode only)
//! 4. Snapshot writing
//!
//! Any error from stages 1, 2 or 4 aborts the run; no partial snapshot is
//! written. Product failures in stage 3 are recorded and reported instead.

use crate::config::{validate, Config};
use crate::harvest::{
    discover_pages, extract_product_links, failed_outcomes, fetch_product_details,
    successful_records, HarvestContext,
};
use crate::output::{write_failure_report, write_snapshot, FailedProduct, HarvestReport, Snapshot};
use crate::HarvestError;
use chrono::Utc;
use std::fmt;
use std::path::Path;

/// Which variant of the pipeline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum HarvestMode {
    /// Stop after link extraction; snapshot is a compact array of product endpoints
    Discovery,

    /// Fetch every product page; snapshot is a pretty `{ totalProducts, products }` object
    #[default]
    Full,
}

impl HarvestMode {
    /// Whether the snapshot of this mode is pretty-printed
    pub fn pretty_snapshot(&self) -> bool {
        matches!(self, Self::Full)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for HarvestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the configuration and stage context of one harvest
pub struct Pipeline {
    config: Config,
    ctx: HarvestContext,
}

impl Pipeline {
    /// Creates a pipeline from a configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Configuration valid and HTTP client built
    /// * `Err(HarvestError)` - Invalid configuration or client setup failure
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        validate(&config)?;
        let ctx = HarvestContext::from_config(&config)?;
        Ok(Self { config, ctx })
    }

    /// The configuration this pipeline runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every stage of the selected mode and writes the snapshot
    pub async fn run(&self, mode: HarvestMode) -> Result<HarvestReport, HarvestError> {
        let started_at = Utc::now();
        tracing::info!("Starting {} harvest of {}", mode, self.ctx.origin);

        let pages = discover_pages(&self.ctx).await?;
        let links = extract_product_links(&self.ctx, &pages).await?;
        let product_links = links.len();

        let (snapshot, failures) = match mode {
            HarvestMode::Discovery => (Snapshot::Endpoints(links), Vec::new()),
            HarvestMode::Full => {
                let outcomes = fetch_product_details(&self.ctx, &links).await;
                let failures: Vec<FailedProduct> = failed_outcomes(&outcomes)
                    .into_iter()
                    .filter_map(FailedProduct::from_outcome)
                    .collect();
                (Snapshot::catalog(successful_records(&outcomes)), failures)
            }
        };

        let snapshot_path = Path::new(&self.config.output.snapshot_path);
        write_snapshot(snapshot_path, &snapshot, mode.pretty_snapshot())?;

        let report = HarvestReport {
            mode,
            started_at,
            finished_at: Utc::now(),
            pages_discovered: pages.len(),
            product_links,
            products_harvested: match &snapshot {
                Snapshot::Catalog(catalog) => catalog.total_products,
                Snapshot::Endpoints(_) => 0,
            },
            failures,
            snapshot_path: self.config.output.snapshot_path.clone(),
        };

        if mode == HarvestMode::Full {
            if let Some(failures_path) = &self.config.output.failures_path {
                write_failure_report(Path::new(failures_path), &report)?;
            }
        }

        tracing::info!(
            "Harvest finished: {} pages, {} product links, {} products, {} failures",
            report.pages_discovered,
            report.product_links,
            report.products_harvested,
            report.failures.len()
        );

        Ok(report)
    }
}

/// Runs a complete harvest
///
/// This is the main entry point for a one-shot run: it builds the pipeline
/// from `config` and runs the selected mode.
pub async fn run_harvest(config: Config, mode: HarvestMode) -> Result<HarvestReport, HarvestError> {
    Pipeline::new(config)?.run(mode).await
}
