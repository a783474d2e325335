//! JSON snapshot persistence
//!
//! The snapshot is the single durable artifact of a harvest. It is written
//! once at the end of a run and overwrites the previous file in place.

use crate::output::error::{OutputError, OutputResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Top-level persisted artifact
///
/// Serialized untagged: the discovery variant is a bare JSON array of
/// endpoints, the full variant an object `{ totalProducts, products }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    /// Product endpoints only (discovery mode)
    Endpoints(Vec<String>),

    /// Harvested product records (full mode)
    Catalog(CatalogSnapshot),
}

/// Full-variant snapshot body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub total_products: usize,
    pub products: Vec<Value>,
}

impl Snapshot {
    /// Builds a full-variant snapshot; the total is the number of records
    pub fn catalog(products: Vec<Value>) -> Self {
        Self::Catalog(CatalogSnapshot {
            total_products: products.len(),
            products,
        })
    }

    /// Number of entries (endpoints or products) carried by the snapshot
    pub fn len(&self) -> usize {
        match self {
            Self::Endpoints(endpoints) => endpoints.len(),
            Self::Catalog(catalog) => catalog.products.len(),
        }
    }

    /// Returns true if the snapshot carries no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Serializes a snapshot
///
/// Pretty output uses two-space indentation; compact output has no whitespace.
pub fn render_snapshot(snapshot: &Snapshot, pretty: bool) -> OutputResult<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(snapshot)
    } else {
        serde_json::to_string(snapshot)
    };
    rendered.map_err(|e| OutputError::Format(e.to_string()))
}

/// Writes a snapshot to `path`, replacing any previous content
///
/// The file is truncated and rewritten in place, so a crash mid-write can
/// leave a truncated snapshot behind.
///
/// # Arguments
///
/// * `path` - Destination file
/// * `snapshot` - The snapshot to persist
/// * `pretty` - Whether to pretty-print
pub fn write_snapshot(path: &Path, snapshot: &Snapshot, pretty: bool) -> OutputResult<()> {
    let json = render_snapshot(snapshot, pretty)?;

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;

    tracing::info!(
        "Wrote snapshot with {} entries to {}",
        snapshot.len(),
        path.display()
    );
    Ok(())
}

/// Reads a snapshot previously written by [`write_snapshot`]
pub fn read_snapshot(path: &Path) -> OutputResult<Snapshot> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| OutputError::Format(e.to_string()))
}
