//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock as a fixture storefront and run the stages and
//! the full pipeline end-to-end against it.

use catalog_harvest::config::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use catalog_harvest::harvest::{
    discover_pages, extract_product_links, fetch_product_details, successful_records,
    HarvestContext,
};
use catalog_harvest::output::read_snapshot;
use catalog_harvest::{FailureKind, HarvestError, HarvestMode, Pipeline, Snapshot};
use serde_json::json;
use std::path::Path;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REQUEST_DELAY_MS: u64 = 20;

/// Creates a test configuration pointing at the mock storefront
fn create_test_config(origin: &str, snapshot_path: &Path) -> Config {
    Config {
        site: SiteConfig {
            origin: origin.to_string(),
            listing_path: "/collections/all".to_string(),
        },
        crawler: CrawlerConfig {
            request_delay_ms: REQUEST_DELAY_MS,
            max_concurrent_requests: 4,
            timeout_secs: 5,
        },
        output: OutputConfig {
            snapshot_path: snapshot_path.to_string_lossy().into_owned(),
            failures_path: None,
        },
        ..Config::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><head></head><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn product_page(data: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            r#"<html><head><script type="application/ld+json">{}</script></head><body></body></html>"#,
            data
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mounts a small storefront: the listing is page one, `/collections/page-2`
/// is page two, and three product pages of which one has no structured data.
async fn mount_storefront(server: &MockServer) {
    mount_get(
        server,
        "/collections/all",
        html(
            r#"
            <div class="pagination">
                <span class="page current">1</span>
                <span class="page"><a href="/collections/page-2">2</a></span>
            </div>
            <div class="grid">
                <a class="grid-product__link" href="/products/chew-toy">Chew Toy</a>
                <a class="grid-product__link" href="{{url}}">Template</a>
            </div>
            "#,
        ),
    )
    .await;

    mount_get(
        server,
        "/collections/page-2",
        html(
            r#"
            <a class="grid-product__link" href="/products/leash">Leash</a>
            <a class="grid-product__link" href="/products/mystery">Mystery</a>
            "#,
        ),
    )
    .await;

    mount_get(
        server,
        "/products/chew-toy",
        product_page(r#"{"name":"Chew Toy","price":"9.99"}"#),
    )
    .await;
    mount_get(
        server,
        "/products/leash",
        product_page(r#"{"name":"Leash","price":"19.00"}"#),
    )
    .await;
    mount_get(server, "/products/mystery", html("<p>Sold out</p>")).await;
}

#[tokio::test]
async fn test_discovery_substitutes_listing_for_missing_link() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "/collections/all",
        html(
            r#"
            <span class="page"><a href="/collections/all?page=2">2</a></span>
            <span class="page">1</span>
            "#,
        ),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("data.json"));
    let ctx = HarvestContext::from_config(&config).unwrap();

    let pages = discover_pages(&ctx).await.expect("Discovery failed");
    assert_eq!(pages, vec!["/collections/all?page=2", "/collections/all"]);
}

#[tokio::test]
async fn test_discovery_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "/collections/all",
        ResponseTemplate::new(503),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("data.json"));
    let ctx = HarvestContext::from_config(&config).unwrap();

    let err = discover_pages(&ctx).await.unwrap_err();
    assert!(matches!(err, HarvestError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_link_extraction_joins_by_input_order() {
    let mock_server = MockServer::start().await;

    // The first page answers last
    mount_get(
        &mock_server,
        "/collections/slow",
        html(
            r#"
            <a class="grid-product__link" href="/products/a">A</a>
            <a class="grid-product__link" href="/products/b">B</a>
            "#,
        )
        .set_delay(Duration::from_millis(200)),
    )
    .await;
    mount_get(
        &mock_server,
        "/collections/fast",
        html(
            r#"
            <a class="grid-product__link" href="{{url}}">Template</a>
            <a class="grid-product__link" href="/products/c">C</a>
            <a class="grid-product__link" href="/products/a">A again</a>
            "#,
        ),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("data.json"));
    let ctx = HarvestContext::from_config(&config).unwrap();

    let endpoints = vec![
        "/collections/slow".to_string(),
        "/collections/fast".to_string(),
    ];
    let links = extract_product_links(&ctx, &endpoints)
        .await
        .expect("Link extraction failed");

    assert_eq!(
        links,
        vec!["/products/a", "/products/b", "/products/c", "/products/a"]
    );
}

#[tokio::test]
async fn test_link_extraction_fails_on_any_page() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "/collections/ok",
        html(r#"<a class="grid-product__link" href="/products/a">A</a>"#),
    )
    .await;
    mount_get(&mock_server, "/collections/gone", ResponseTemplate::new(404)).await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("data.json"));
    let ctx = HarvestContext::from_config(&config).unwrap();

    let endpoints = vec!["/collections/ok".to_string(), "/collections/gone".to_string()];
    let err = extract_product_links(&ctx, &endpoints).await.unwrap_err();
    assert!(matches!(err, HarvestError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_product_details_record_failures_and_continue() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "/products/chew-toy",
        product_page(r#"{"name":"Chew Toy","price":"9.99"}"#),
    )
    .await;
    mount_get(&mock_server, "/products/gone", ResponseTemplate::new(404)).await;
    mount_get(
        &mock_server,
        "/products/broken",
        product_page(r#"{"name": "Broken","#),
    )
    .await;
    mount_get(
        &mock_server,
        "/products/leash",
        product_page(r#"{"name":"Leash","price":"19.00"}"#),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("data.json"));
    let ctx = HarvestContext::from_config(&config).unwrap();

    let endpoints: Vec<String> = ["/products/chew-toy", "/products/gone", "/products/broken", "/products/leash"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let start = Instant::now();
    let outcomes = fetch_product_details(&ctx, &endpoints).await;
    let elapsed = start.elapsed();

    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes[1].failure_kind(), Some(FailureKind::HttpStatus));
    assert_eq!(
        outcomes[2].failure_kind(),
        Some(FailureKind::MalformedStructuredData)
    );

    let records = successful_records(&outcomes);
    assert_eq!(
        records,
        vec![
            json!({"name": "Chew Toy", "price": "9.99"}),
            json!({"name": "Leash", "price": "19.00"}),
        ]
    );

    assert!(
        elapsed >= Duration::from_millis(REQUEST_DELAY_MS * endpoints.len() as u64),
        "Expected at least {}ms of delay, took {:?}",
        REQUEST_DELAY_MS * endpoints.len() as u64,
        elapsed
    );
}

#[tokio::test]
async fn test_link_extraction_respects_concurrency_bound() {
    let mock_server = MockServer::start().await;
    let page_delay = Duration::from_millis(150);

    let endpoints: Vec<String> = (1..=3).map(|n| format!("/collections/page-{}", n)).collect();
    for endpoint in &endpoints {
        mount_get(
            &mock_server,
            endpoint,
            html(r#"<a class="grid-product__link" href="/products/a">A</a>"#)
                .set_delay(page_delay),
        )
        .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&mock_server.uri(), &dir.path().join("data.json"));
    config.crawler.max_concurrent_requests = 1;
    let ctx = HarvestContext::from_config(&config).unwrap();

    let start = Instant::now();
    let links = extract_product_links(&ctx, &endpoints)
        .await
        .expect("Link extraction failed");
    let elapsed = start.elapsed();

    assert_eq!(links.len(), 3);
    // One page at a time: the delays add up
    assert!(
        elapsed >= page_delay * endpoints.len() as u32,
        "Expected serialized fetches, took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_product_details_time_out_hung_page() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "/products/hung",
        product_page(r#"{"name":"Hung"}"#).set_delay(Duration::from_secs(3)),
    )
    .await;
    mount_get(
        &mock_server,
        "/products/leash",
        product_page(r#"{"name":"Leash","price":"19.00"}"#),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&mock_server.uri(), &dir.path().join("data.json"));
    config.crawler.timeout_secs = 1;
    let ctx = HarvestContext::from_config(&config).unwrap();

    let endpoints = vec!["/products/hung".to_string(), "/products/leash".to_string()];
    let start = Instant::now();
    let outcomes = fetch_product_details(&ctx, &endpoints).await;

    assert!(start.elapsed() < Duration::from_secs(3));
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].failure_kind(), Some(FailureKind::Network));
    assert_eq!(
        successful_records(&outcomes),
        vec![json!({"name": "Leash", "price": "19.00"})]
    );
}

#[tokio::test]
async fn test_full_pipeline_writes_catalog_snapshot() {
    let mock_server = MockServer::start().await;
    mount_storefront(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let snapshot_path = dir.path().join("data.json");
    let failures_path = dir.path().join("failures.json");

    let mut config = create_test_config(&mock_server.uri(), &snapshot_path);
    config.output.failures_path = Some(failures_path.to_string_lossy().into_owned());

    let pipeline = Pipeline::new(config).expect("Failed to create pipeline");
    let report = pipeline.run(HarvestMode::Full).await.expect("Harvest failed");

    assert_eq!(report.pages_discovered, 2);
    assert_eq!(report.product_links, 3);
    assert_eq!(report.products_harvested, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].endpoint, "/products/mystery");
    assert_eq!(report.failures[0].kind, FailureKind::MissingStructuredData);

    let expected = Snapshot::catalog(vec![
        json!({"name": "Chew Toy", "price": "9.99"}),
        json!({"name": "Leash", "price": "19.00"}),
    ]);
    assert_eq!(read_snapshot(&snapshot_path).unwrap(), expected);

    // Full mode pretty-prints with two-space indentation
    let raw = std::fs::read_to_string(&snapshot_path).unwrap();
    assert!(raw.starts_with("{\n  \"totalProducts\": 2,\n  \"products\": ["));

    let failures: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&failures_path).unwrap()).unwrap();
    assert_eq!(failures["failures"][0]["endpoint"], "/products/mystery");
    assert_eq!(failures["failures"][0]["kind"], "missing_structured_data");
}

#[tokio::test]
async fn test_discovery_mode_writes_compact_endpoints() {
    let mock_server = MockServer::start().await;
    mount_storefront(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let snapshot_path = dir.path().join("data.json");
    let config = create_test_config(&mock_server.uri(), &snapshot_path);

    let pipeline = Pipeline::new(config).expect("Failed to create pipeline");
    let report = pipeline
        .run(HarvestMode::Discovery)
        .await
        .expect("Harvest failed");

    assert_eq!(report.products_harvested, 0);
    assert!(report.failures.is_empty());

    // Discovery mode never visits product pages
    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    assert!(!requests.is_empty());
    assert!(
        requests
            .iter()
            .all(|request| !request.url.path().starts_with("/products/")),
        "Product page fetched in discovery mode"
    );

    let raw = std::fs::read_to_string(&snapshot_path).unwrap();
    assert_eq!(
        raw,
        r#"["/products/chew-toy","/products/leash","/products/mystery"]"#
    );
}

#[tokio::test]
async fn test_pipeline_is_idempotent() {
    let mock_server = MockServer::start().await;
    mount_storefront(&mock_server).await;

    let dir = tempfile::tempdir().unwrap();
    let snapshot_path = dir.path().join("data.json");
    let config = create_test_config(&mock_server.uri(), &snapshot_path);
    let pipeline = Pipeline::new(config).expect("Failed to create pipeline");

    pipeline.run(HarvestMode::Full).await.expect("First run failed");
    let first = std::fs::read_to_string(&snapshot_path).unwrap();

    pipeline.run(HarvestMode::Full).await.expect("Second run failed");
    let second = std::fs::read_to_string(&snapshot_path).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failed_run_keeps_previous_snapshot() {
    let mock_server = MockServer::start().await;
    mount_get(
        &mock_server,
        "/collections/all",
        html(r#"<span class="page"><a href="/collections/missing">2</a></span>"#),
    )
    .await;
    mount_get(&mock_server, "/collections/missing", ResponseTemplate::new(500)).await;

    let dir = tempfile::tempdir().unwrap();
    let snapshot_path = dir.path().join("data.json");
    std::fs::write(&snapshot_path, r#"["/products/previous"]"#).unwrap();

    let config = create_test_config(&mock_server.uri(), &snapshot_path);
    let pipeline = Pipeline::new(config).expect("Failed to create pipeline");

    let result = pipeline.run(HarvestMode::Full).await;
    assert!(matches!(result, Err(HarvestError::Status { status: 500, .. })));

    assert_eq!(
        read_snapshot(&snapshot_path).unwrap(),
        Snapshot::Endpoints(vec!["/products/previous".to_string()])
    );
}
