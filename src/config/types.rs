use serde::Deserialize;

/// Main configuration structure for Catalog-Harvest
///
/// Every section has defaults matching the original storefront, so a run
/// without a configuration file harvests that site into `data.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
}

/// Target storefront
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site origin every endpoint is resolved against
    pub origin: String,

    /// Path of the "all collections" listing page
    #[serde(rename = "listing-path")]
    pub listing_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "https://maggiesdogwellness.com".to_string(),
            listing_path: "/collections/all".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Fixed delay before every product page fetch (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Maximum number of collection pages fetched at once
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1000,
            max_concurrent_requests: 8,
            timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "catalog-harvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/catalog-harvest/catalog-harvest".to_string(),
        }
    }
}

/// CSS selectors describing the storefront markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Entries of the listing page's pagination
    pub page: String,

    /// Link looked up inside each pagination entry
    #[serde(rename = "page-link")]
    pub page_link: String,

    /// Product links on a collection page
    #[serde(rename = "product-link")]
    pub product_link: String,

    /// Unrendered template href skipped during link extraction
    #[serde(rename = "link-placeholder")]
    pub link_placeholder: String,

    /// Block carrying the embedded product metadata
    #[serde(rename = "structured-data")]
    pub structured_data: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            page: ".page".to_string(),
            page_link: "a".to_string(),
            product_link: "a.grid-product__link".to_string(),
            link_placeholder: "{{url}}".to_string(),
            structured_data: r#"script[type="application/ld+json"]"#.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON snapshot, overwritten on every run
    #[serde(rename = "snapshot-path")]
    pub snapshot_path: String,

    /// Optional path of the JSON failure report (full mode only)
    #[serde(rename = "failures-path")]
    pub failures_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "data.json".to_string(),
            failures_path: None,
        }
    }
}
