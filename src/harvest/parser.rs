//! HTML extraction for storefront pages
//!
//! This module turns fetched markup into the values each stage needs:
//! - Collection endpoints from the listing page's pagination entries
//! - Product endpoints from a collection page's product grid
//! - The structured product record embedded in a product page
//!
//! All selectors come from configuration and are compiled once per run.

use crate::config::SelectorConfig;
use crate::{ConfigError, HarvestError};
use scraper::{Html, Selector};
use serde_json::Value;

/// Compiled CSS selectors for one storefront
#[derive(Debug, Clone)]
pub struct Selectors {
    page: Selector,
    page_link: Selector,
    product_link: Selector,
    structured_data: Selector,
    link_placeholder: String,
}

impl Selectors {
    /// Compiles every selector of the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Selectors)` - All selectors compiled
    /// * `Err(ConfigError::InvalidSelector)` - The first selector that failed to parse
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            page: compile_selector(&config.page)?,
            page_link: compile_selector(&config.page_link)?,
            product_link: compile_selector(&config.product_link)?,
            structured_data: compile_selector(&config.structured_data)?,
            link_placeholder: config.link_placeholder.clone(),
        })
    }
}

fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Extracts collection endpoints from the listing page
///
/// Every pagination entry contributes exactly one endpoint, in document order:
/// the `href` of its first link, or `fallback` when the entry has no link
/// (the current page is usually rendered without one).
///
/// # Example
///
/// ```
/// use catalog_harvest::config::SelectorConfig;
/// use catalog_harvest::harvest::{extract_page_endpoints, Selectors};
///
/// let selectors = Selectors::compile(&SelectorConfig::default()).unwrap();
/// let html = r#"<span class="page"><a href="/collections/all?page=2">2</a></span>
///               <span class="page">1</span>"#;
/// let pages = extract_page_endpoints(html, &selectors, "/collections/all");
/// assert_eq!(pages, vec!["/collections/all?page=2", "/collections/all"]);
/// ```
pub fn extract_page_endpoints(html: &str, selectors: &Selectors, fallback: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.page)
        .map(|entry| {
            entry
                .select(&selectors.page_link)
                .next()
                .and_then(|link| link.value().attr("href"))
                .unwrap_or(fallback)
                .to_string()
        })
        .collect()
}

/// Extracts product endpoints from a collection page
///
/// Links without an `href` and links still carrying the unrendered template
/// placeholder are skipped. Duplicates are kept.
pub fn extract_product_links(html: &str, selectors: &Selectors) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.product_link)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| *href != selectors.link_placeholder)
        .map(str::to_string)
        .collect()
}

/// Extracts and parses the first structured data block of a product page
///
/// # Arguments
///
/// * `html` - The product page markup
/// * `selectors` - The compiled storefront selectors
/// * `url` - The page URL, used for error reporting
///
/// # Returns
///
/// * `Ok(Value)` - The parsed record, whatever its shape
/// * `Err(HarvestError::MissingStructuredData)` - No block on the page
/// * `Err(HarvestError::MalformedStructuredData)` - The block is not valid JSON
pub fn extract_structured_data(
    html: &str,
    selectors: &Selectors,
    url: &str,
) -> Result<Value, HarvestError> {
    let document = Html::parse_document(html);

    let block = document
        .select(&selectors.structured_data)
        .next()
        .ok_or_else(|| HarvestError::MissingStructuredData {
            url: url.to_string(),
        })?;

    let text = block.text().collect::<String>();

    serde_json::from_str(text.trim()).map_err(|source| HarvestError::MalformedStructuredData {
        url: url.to_string(),
        source,
    })
}
