use crate::harvest::fetcher::fetch_page;
use crate::harvest::parser::extract_structured_data;
use crate::harvest::HarvestContext;
use crate::state::ProductOutcome;
use crate::HarvestError;
use serde_json::Value;

/// Fetches the structured record of every product endpoint
///
/// Endpoints are processed strictly one after another. Each one waits the
/// configured request delay before its fetch, so a run takes at least
/// `endpoints.len() * request_delay`. A failing endpoint is logged and recorded
/// as [`ProductOutcome::Failed`]; the loop always continues.
///
/// # Returns
///
/// One outcome per input endpoint, in input order
pub async fn fetch_product_details(
    ctx: &HarvestContext,
    endpoints: &[String],
) -> Vec<ProductOutcome> {
    tracing::info!(
        "Fetching {} product pages ({}ms apart)",
        endpoints.len(),
        ctx.request_delay.as_millis()
    );

    let mut outcomes = Vec::with_capacity(endpoints.len());

    for (index, endpoint) in endpoints.iter().enumerate() {
        tokio::time::sleep(ctx.request_delay).await;

        let outcome = match fetch_product_record(ctx, endpoint).await {
            Ok(record) => ProductOutcome::Harvested {
                endpoint: endpoint.clone(),
                record,
            },
            Err(e) => {
                tracing::warn!("Skipping product {}: {}", endpoint, e);
                ProductOutcome::failed(endpoint.as_str(), &e)
            }
        };
        outcomes.push(outcome);

        if (index + 1) % 25 == 0 {
            tracing::info!("Progress: {}/{} product pages", index + 1, endpoints.len());
        }
    }

    let harvested = outcomes.iter().filter(|o| o.is_success()).count();
    tracing::info!(
        "Harvested {} of {} product records",
        harvested,
        endpoints.len()
    );

    outcomes
}

async fn fetch_product_record(ctx: &HarvestContext, endpoint: &str) -> Result<Value, HarvestError> {
    let url = ctx.resolve(endpoint)?;
    let body = fetch_page(&ctx.client, &url).await?;
    extract_structured_data(&body, &ctx.selectors, url.as_str())
}

/// Returns the harvested records in input order, skipping failures
pub fn successful_records(outcomes: &[ProductOutcome]) -> Vec<Value> {
    outcomes
        .iter()
        .filter_map(|outcome| outcome.record().cloned())
        .collect()
}

/// Returns the failed outcomes in input order
pub fn failed_outcomes(outcomes: &[ProductOutcome]) -> Vec<&ProductOutcome> {
    outcomes.iter().filter(|outcome| !outcome.is_success()).collect()
}
