mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use common::listing;
use ens_deals::domains::marketplace::error::TargetError;
use ens_deals::kernel::test_dependencies::{
    MockDomainRegistry, MockListingScraper, TestDependencies,
};
use ens_deals::kernel::{DomainInfo, MemoryListingStore};
use ens_deals::server::build_app;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(deps: TestDependencies) -> Router {
    build_app(deps.into_server_deps(), &[])
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// =============================================================================
// Tests: /health
// =============================================================================

#[tokio::test]
async fn test_health_reports_store_and_targets() {
    let (status, body) = send(app(TestDependencies::new()), "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["backend"], "memory");
    assert_eq!(body["targets"], 3);
}

// =============================================================================
// Tests: POST /api/crawl
// =============================================================================

#[tokio::test]
async fn test_crawl_falls_back_and_stores() {
    let store = Arc::new(MemoryListingStore::new());
    let scraper = MockListingScraper::new()
        .with_failure(
            "Vision",
            TargetError::Http {
                status: 500,
                message: "boom".to_string(),
            },
        )
        .with_listings(
            "OpenSea",
            vec![json!({ "domainName": "ABC.eth", "price": "0.4 ETH", "floorPrice": "1 ETH" })],
        );
    let deps = TestDependencies::new()
        .mock_scraper(scraper)
        .listing_store(store.clone());

    let (status, body) = send(app(deps), "POST", "/api/crawl").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "OpenSea");
    assert_eq!(body["stored"], 1);
    assert_eq!(body["failed_targets"][0]["target"], "Vision");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_crawl_connectivity_failure_is_503() {
    let scraper = MockListingScraper::new().with_probe_failure(TargetError::Http {
        status: 401,
        message: "Unauthorized".to_string(),
    });
    let deps = TestDependencies::new().mock_scraper(scraper);

    let (status, body) = send(app(deps), "POST", "/api/crawl").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn test_crawl_exhausted_is_502_with_guidance() {
    let (status, body) = send(app(TestDependencies::new()), "POST", "/api/crawl").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("3 attempt(s)"));
    assert!(error.contains("direct data source"));
}

// =============================================================================
// Tests: GET /api/deals
// =============================================================================

#[tokio::test]
async fn test_deals_filters_by_query() {
    let store = MemoryListingStore::new()
        .with_listing(&listing("deep.eth", "0.2", Some("1")), "Vision")
        .with_listing(&listing("shallow.eth", "0.9", Some("1")), "Vision")
        .with_listing(&listing("pricey.eth", "5", Some("10")), "Vision");
    let deps = TestDependencies::new().listing_store(Arc::new(store));

    let (status, body) = send(
        app(deps),
        "GET",
        "/api/deals?min_discount=20&max_price=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["listings_considered"], 3);
    assert_eq!(body["deals_found"], 1);
    assert_eq!(body["best_deal"]["domain_name"], "deep.eth");
}

#[tokio::test]
async fn test_deals_rejects_bad_discount() {
    let (status, _) = send(
        app(TestDependencies::new()),
        "GET",
        "/api/deals?min_discount=150",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Tests: GET /api/valuate/:name
// =============================================================================

#[tokio::test]
async fn test_valuate_returns_estimate() {
    let (status, body) = send(app(TestDependencies::new()), "GET", "/api/valuate/123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "123.eth");
    assert_eq!(body["estimated_value_eth"], 15.0);
    assert_eq!(body["confidence"], "low");
}

#[tokio::test]
async fn test_valuate_invalid_name_is_400() {
    let (status, body) = send(app(TestDependencies::new()), "GET", "/api/valuate/ab.eth").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("ab.eth"));
}

// =============================================================================
// Tests: GET /api/domains/:name
// =============================================================================

#[tokio::test]
async fn test_domain_info_found_and_missing() {
    let registry = MockDomainRegistry::new().with_domain(DomainInfo {
        name: "vitalik.eth".to_string(),
        label_name: Some("vitalik".to_string()),
        owner: Some("0xd8da6bf26964af9d7eed9e03e53415d37aa96045".to_string()),
        resolved_address: Some("0xd8da6bf26964af9d7eed9e03e53415d37aa96045".to_string()),
        created_at: None,
        registered_at: None,
        expires_at: None,
    });
    let router = app(TestDependencies::new().mock_registry(registry));

    let (status, body) = send(router.clone(), "GET", "/api/domains/Vitalik.eth").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label_name"], "vitalik");

    let (status, body) = send(router, "GET", "/api/domains/unregistered.eth").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unregistered.eth is not registered");
}

#[tokio::test]
async fn test_domain_info_registry_failure_is_500() {
    let deps = TestDependencies::new().mock_registry(MockDomainRegistry::new().failing());
    let (status, _) = send(app(deps), "GET", "/api/domains/nick.eth").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
