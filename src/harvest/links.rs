use crate::harvest::fetcher::fetch_page;
use crate::harvest::parser;
use crate::harvest::HarvestContext;
use crate::HarvestError;
use futures::future::try_join_all;
use tokio::sync::Semaphore;

/// Extracts product endpoints from every collection page
///
/// Collection pages are fetched concurrently, at most
/// `max_concurrent_requests` at a time. Per-page results are joined in input
/// order and flattened, so the output does not depend on which fetch finishes
/// first. The first failing page fails the whole extraction; fetches still in
/// flight are dropped.
///
/// # Arguments
///
/// * `ctx` - The harvest context
/// * `endpoints` - Collection endpoints, usually from page discovery
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Product endpoints, duplicates included
/// * `Err(HarvestError)` - A collection page could not be fetched
pub async fn extract_product_links(
    ctx: &HarvestContext,
    endpoints: &[String],
) -> Result<Vec<String>, HarvestError> {
    tracing::info!(
        "Extracting product links from {} collection pages ({} at a time)",
        endpoints.len(),
        ctx.max_concurrent_requests
    );

    let semaphore = Semaphore::new(ctx.max_concurrent_requests);
    let semaphore = &semaphore;

    let per_page = try_join_all(endpoints.iter().map(|endpoint| async move {
        // The semaphore is never closed, so acquire only waits
        let _permit = semaphore.acquire().await.ok();
        collect_page_links(ctx, endpoint).await
    }))
    .await?;

    let links: Vec<String> = per_page.into_iter().flatten().collect();
    tracing::info!("Extracted {} product links", links.len());

    Ok(links)
}

/// Fetches one collection page and returns its product links in document order
async fn collect_page_links(
    ctx: &HarvestContext,
    endpoint: &str,
) -> Result<Vec<String>, HarvestError> {
    let url = ctx.resolve(endpoint)?;
    let body = fetch_page(&ctx.client, &url).await?;
    let links = parser::extract_product_links(&body, &ctx.selectors);

    tracing::debug!("{} product links on {}", links.len(), url);
    Ok(links)
}
