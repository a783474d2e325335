//! Configuration module for Catalog-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional; missing ones fall back to the documented defaults.
//!
//! # Example
//!
//! ```no_run
//! use catalog_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting {}", config.site.origin);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, SelectorConfig, SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
