//! Run reporting
//!
//! This module summarizes a harvest run for the console and, optionally,
//! persists the failed product endpoints as a JSON report next to the snapshot.

use crate::output::error::{OutputError, OutputResult};
use crate::pipeline::HarvestMode;
use crate::state::{FailureKind, ProductOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A product endpoint that yielded no record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedProduct {
    pub endpoint: String,
    pub kind: FailureKind,
    pub message: String,
}

impl FailedProduct {
    /// Extracts the failure from an outcome, if it is one
    pub fn from_outcome(outcome: &ProductOutcome) -> Option<Self> {
        match outcome {
            ProductOutcome::Failed {
                endpoint,
                kind,
                message,
            } => Some(Self {
                endpoint: endpoint.clone(),
                kind: *kind,
                message: message.clone(),
            }),
            ProductOutcome::Harvested { .. } => None,
        }
    }
}

/// Summary of one harvest run
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub mode: HarvestMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Collection pages found by page discovery
    pub pages_discovered: usize,

    /// Product endpoints found by link extraction
    pub product_links: usize,

    /// Product records written to the snapshot (full mode only)
    pub products_harvested: usize,

    /// Product endpoints that failed (full mode only)
    pub failures: Vec<FailedProduct>,

    /// Where the snapshot was written
    pub snapshot_path: String,
}

impl HarvestReport {
    /// Run duration in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Failure counts per kind
    pub fn failures_by_kind(&self) -> HashMap<FailureKind, usize> {
        let mut counts = HashMap::new();
        for failure in &self.failures {
            *counts.entry(failure.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Returns the share of product endpoints harvested, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.product_links == 0 {
            return 0.0;
        }
        (self.products_harvested as f64 / self.product_links as f64) * 100.0
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureReport<'a> {
    generated_at: DateTime<Utc>,
    total_failures: usize,
    failures: &'a [FailedProduct],
}

/// Writes the failed product endpoints of a run as pretty JSON
pub fn write_failure_report(path: &Path, report: &HarvestReport) -> OutputResult<()> {
    let body = FailureReport {
        generated_at: report.finished_at,
        total_failures: report.failures.len(),
        failures: &report.failures,
    };
    let json =
        serde_json::to_string_pretty(&body).map_err(|e| OutputError::Format(e.to_string()))?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;

    tracing::info!(
        "Wrote failure report with {} entries to {}",
        report.failures.len(),
        path.display()
    );
    Ok(())
}

/// Prints a run report to stdout in a formatted manner
pub fn print_report(report: &HarvestReport) {
    println!("=== Harvest Report ===\n");

    println!("Run:");
    println!("  Mode: {}", report.mode);
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Duration: {} seconds", report.duration_seconds());
    println!("  Snapshot: {}", report.snapshot_path);
    println!();

    println!("Overview:");
    println!("  Collection pages: {}", report.pages_discovered);
    println!("  Product links: {}", report.product_links);
    if report.mode == HarvestMode::Full {
        println!("  Products harvested: {}", report.products_harvested);
    }
    println!();

    if !report.failures.is_empty() {
        println!("Failures by Kind:");
        let mut kind_counts: Vec<_> = report.failures_by_kind().into_iter().collect();
        kind_counts.sort_by(|a, b| b.1.cmp(&a.1));
        for (kind, count) in kind_counts {
            println!("  {}: {}", kind, count);
        }
        println!();

        println!("Failed Products ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  - {} ({})", failure.endpoint, failure.kind);
        }
        println!();
    }

    if report.mode == HarvestMode::Full {
        println!(
            "Success Rate: {:.1}% ({} / {} product pages harvested)",
            report.success_rate(),
            report.products_harvested,
            report.product_links
        );
    }
}
