//! Scrape the marketplaces and persist whatever the winning target returned.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::error::ScrapeError;
use super::scraper::scrape_first_available;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Serialize)]
pub struct FailedTarget {
    pub target: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectReport {
    /// Name of the marketplace that produced the listings
    pub source: String,
    pub source_url: String,
    pub scraped: usize,
    pub stored: usize,
    pub store_failures: usize,
    pub below_floor: usize,
    /// Listings dropped because they could not be decoded
    pub skipped: usize,
    pub failed_targets: Vec<FailedTarget>,
    pub scraped_at: DateTime<Utc>,
}

/// Run the fallback scrape and upsert every normalized listing into the store.
///
/// Store failures are logged and counted per listing; only scrape failures abort.
pub async fn collect_listings(deps: &ServerDeps) -> Result<CollectReport, ScrapeError> {
    let win =
        scrape_first_available(deps.scraper.as_ref(), &deps.targets, deps.scrape_options).await?;

    let mut stored = 0;
    let mut store_failures = 0;
    for listing in &win.listings {
        match deps.store.upsert(listing, &win.target.name).await {
            Ok(_) => stored += 1,
            Err(e) => {
                store_failures += 1;
                warn!(domain = %listing.domain_name, error = %e, "Failed to store listing");
            }
        }
    }

    let below_floor = win.listings.iter().filter(|l| l.is_below_floor).count();

    info!(
        source = %win.target.name,
        scraped = win.listings.len(),
        stored,
        store_failures,
        below_floor,
        "Listing collection complete"
    );

    Ok(CollectReport {
        source: win.target.name.clone(),
        source_url: win.target.url.clone(),
        scraped: win.listings.len(),
        stored,
        store_failures,
        below_floor,
        skipped: win.skipped,
        failed_targets: win
            .failures
            .iter()
            .map(|f| FailedTarget {
                target: f.target.clone(),
                error: f.error.to_string(),
            })
            .collect(),
        scraped_at: win.scraped_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::marketplace::error::TargetError;
    use crate::domains::marketplace::targets::default_targets;
    use crate::kernel::memory_store::MemoryListingStore;
    use crate::kernel::test_dependencies::{MockListingScraper, TestDependencies};
    use crate::kernel::BaseListingStore;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_collect_stores_listings_tagged_with_source() {
        let store = Arc::new(MemoryListingStore::new());
        let scraper = MockListingScraper::new()
            .with_failure("Vision", TargetError::Transport("timeout".to_string()))
            .with_listings(
                "OpenSea",
                vec![
                    json!({ "domainName": "abc.eth", "price": "0.5 ETH", "floorPrice": "1 ETH" }),
                    json!({ "domainName": "xyz.eth", "price": "3 ETH", "floorPrice": "1 ETH" }),
                ],
            );
        let deps = TestDependencies::new()
            .mock_scraper(scraper)
            .listing_store(store.clone())
            .into_server_deps();

        let report = collect_listings(&deps).await.unwrap();

        assert_eq!(report.source, "OpenSea");
        assert_eq!(report.scraped, 2);
        assert_eq!(report.stored, 2);
        assert_eq!(report.below_floor, 1);
        assert_eq!(report.failed_targets.len(), 1);
        assert_eq!(report.failed_targets[0].target, "Vision");

        let saved = store.find_by_domain("abc.eth").await.unwrap().unwrap();
        assert_eq!(saved.source, "OpenSea");
        assert!(saved.is_below_floor);
    }

    #[tokio::test]
    async fn test_collect_walks_configured_targets_in_order() {
        let targets: Vec<_> = default_targets().into_iter().rev().collect();
        let scraper = Arc::new(MockListingScraper::new().with_listings(
            "Vision",
            vec![json!({ "domainName": "abc.eth", "price": "0.5 ETH" })],
        ));
        let deps = TestDependencies::new()
            .shared_scraper(scraper.clone())
            .targets(targets)
            .into_server_deps();

        let report = collect_listings(&deps).await.unwrap();

        assert_eq!(report.source, "Vision");
        assert_eq!(scraper.probe_count(), 1);
        assert_eq!(scraper.scrape_calls(), vec!["ENS.Vision", "OpenSea", "Vision"]);
    }

    #[tokio::test]
    async fn test_collect_counts_store_failures() {
        let store = Arc::new(MemoryListingStore::new().failing_upserts());
        let scraper = MockListingScraper::new().with_listings(
            "Vision",
            vec![json!({ "domainName": "abc.eth", "price": "0.5 ETH" })],
        );
        let deps = TestDependencies::new()
            .mock_scraper(scraper)
            .listing_store(store)
            .into_server_deps();

        let report = collect_listings(&deps).await.unwrap();
        assert_eq!(report.stored, 0);
        assert_eq!(report.store_failures, 1);
    }
}
