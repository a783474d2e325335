//! Harvest stages for storefront catalog retrieval
//!
//! This module contains the stage logic of a harvest, leaves first:
//! - HTTP fetching and endpoint resolution
//! - HTML extraction of endpoints and structured data
//! - Page discovery from the collection listing
//! - Concurrent product link extraction from collection pages
//! - Sequential, rate-limited product detail fetching

mod details;
mod discovery;
mod fetcher;
mod links;
mod parser;

pub use details::{failed_outcomes, fetch_product_details, successful_records};
pub use discovery::discover_pages;
pub use fetcher::{build_http_client, fetch_page, format_user_agent, resolve_endpoint};
pub use links::extract_product_links;
pub use parser::{
    extract_page_endpoints, extract_product_links as extract_product_links_from_html,
    extract_structured_data, Selectors,
};

use crate::config::Config;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Everything a stage needs to talk to the storefront
///
/// Built once per run from the configuration; stages borrow it immutably.
#[derive(Debug, Clone)]
pub struct HarvestContext {
    /// Shared HTTP client
    pub client: Client,

    /// Site origin every endpoint is resolved against
    pub origin: Url,

    /// Listing endpoint, also the fallback for pagination entries without a link
    pub listing_path: String,

    /// Compiled storefront selectors
    pub selectors: Selectors,

    /// Delay before every product page fetch
    pub request_delay: Duration,

    /// Upper bound on concurrent collection page fetches
    pub max_concurrent_requests: usize,
}

impl HarvestContext {
    /// Creates a context from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(HarvestContext)` - Client built and selectors compiled
    /// * `Err(HarvestError)` - Invalid origin, selector, or client setup failure
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let origin = Url::parse(&config.site.origin)?;
        let selectors = Selectors::compile(&config.selectors)?;

        Ok(Self {
            client,
            origin,
            listing_path: config.site.listing_path.clone(),
            selectors,
            request_delay: Duration::from_millis(config.crawler.request_delay_ms),
            max_concurrent_requests: config.crawler.max_concurrent_requests.max(1),
        })
    }

    /// Resolves an endpoint against the configured origin
    pub fn resolve(&self, endpoint: &str) -> Result<Url, HarvestError> {
        resolve_endpoint(&self.origin, endpoint)
    }
}
