use crate::harvest::fetcher::fetch_page;
use crate::harvest::parser::extract_page_endpoints;
use crate::harvest::HarvestContext;
use crate::HarvestError;

/// Discovers the collection pages of the storefront
///
/// Fetches the listing page once and returns one endpoint per pagination
/// entry, in document order. Any fetch error is returned to the caller.
pub async fn discover_pages(ctx: &HarvestContext) -> Result<Vec<String>, HarvestError> {
    let listing_url = ctx.resolve(&ctx.listing_path)?;
    tracing::info!("Discovering collection pages from {}", listing_url);

    let body = fetch_page(&ctx.client, &listing_url).await?;
    let pages = extract_page_endpoints(&body, &ctx.selectors, &ctx.listing_path);

    if pages.is_empty() {
        tracing::warn!("No pagination entries found on {}", listing_url);
    } else {
        tracing::info!("Discovered {} collection pages", pages.len());
    }

    Ok(pages)
}
