//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of a harvest:
//! - Building the HTTP client with a descriptive user agent and timeouts
//! - Resolving relative endpoints against the site origin
//! - GET requests returning the page body, with non-success statuses as errors

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::{CrawlerConfig, UserAgentConfig};
/// use catalog_harvest::harvest::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(format_user_agent(user_agent))
        .timeout(Duration::from_secs(crawler.timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent header: `Name/Version (+ContactURL)`
pub fn format_user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    )
}

/// Resolves an endpoint against the site origin
///
/// Relative paths (with or without query strings) are joined onto the origin;
/// absolute hrefs pass through unchanged.
pub fn resolve_endpoint(origin: &Url, endpoint: &str) -> Result<Url, HarvestError> {
    origin
        .join(endpoint.trim())
        .map_err(|e| HarvestError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
}

/// Fetches a page and returns its body
///
/// # Returns
///
/// * `Ok(String)` - The response body of a 2xx response
/// * `Err(HarvestError::Status)` - The server answered with a non-success status
/// * `Err(HarvestError::Http)` - Connection, timeout, or body decoding failure
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, HarvestError> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })
}
