//! Output module for persisting harvest results
//!
//! This module handles:
//! - Writing and reading the JSON snapshot
//! - Summarizing a run and reporting failed product endpoints

mod error;
mod report;
mod snapshot;

pub use error::{OutputError, OutputResult};
pub use report::{print_report, write_failure_report, FailedProduct, HarvestReport};
pub use snapshot::{read_snapshot, render_snapshot, write_snapshot, CatalogSnapshot, Snapshot};

/// Prints a short description of a snapshot read back from disk
pub fn print_snapshot_summary(snapshot: &Snapshot) {
    match snapshot {
        Snapshot::Endpoints(endpoints) => {
            println!("Discovery snapshot: {} product endpoints", endpoints.len());
            for endpoint in endpoints.iter().take(10) {
                println!("  - {}", endpoint);
            }
            if endpoints.len() > 10 {
                println!("  ... and {} more", endpoints.len() - 10);
            }
        }
        Snapshot::Catalog(catalog) => {
            println!(
                "Catalog snapshot: {} products (totalProducts = {})",
                catalog.products.len(),
                catalog.total_products
            );
            for product in catalog.products.iter().take(10) {
                let name = product
                    .get("name")
                    .or_else(|| product.get("title"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("<unnamed>");
                println!("  - {}", name);
            }
            if catalog.products.len() > 10 {
                println!("  ... and {} more", catalog.products.len() - 10);
            }
        }
    }
}
