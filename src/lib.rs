//! Catalog-Harvest: a storefront catalog harvester
//!
//! This crate crawls the collection-listing pages of a single storefront,
//! discovers product page links, extracts the structured product data embedded
//! in every product page and persists the aggregated catalog as a JSON snapshot.

pub mod config;
pub mod harvest;
pub mod output;
pub mod pipeline;
pub mod state;

use thiserror::Error;

/// Main error type for Catalog-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Cannot resolve endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    #[error("No structured data block found at {url}")]
    MissingStructuredData { url: String },

    #[error("Malformed structured data at {url}: {source}")]
    MalformedStructuredData {
        url: String,
        source: serde_json::Error,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for Catalog-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use output::{HarvestReport, Snapshot};
pub use pipeline::{run_harvest, HarvestMode, Pipeline};
pub use state::{FailureKind, ProductOutcome};
