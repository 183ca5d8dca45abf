//! Deals domain - ranking stored listings that sit under their floor.

pub mod analysis;

pub use analysis::{analyze_deals, Deal, DealCriteria, DealReport};

use anyhow::Result;

use crate::kernel::ServerDeps;

/// How many stored listings deal analysis and valuation load at once.
pub const ANALYSIS_WINDOW: i64 = 1000;

/// Analyze the deepest below-floor listings in the store.
///
/// `listings_considered` is the number of stored listings, below floor or not.
pub async fn analyze_stored_deals(deps: &ServerDeps, criteria: &DealCriteria) -> Result<DealReport> {
    let below_floor: Vec<_> = deps
        .store
        .find_below_floor(ANALYSIS_WINDOW)
        .await?
        .iter()
        .map(|row| row.to_normalized())
        .collect();
    let stored = deps.store.count().await?;

    let mut report = analyze_deals(&below_floor, criteria);
    report.listings_considered = usize::try_from(stored).unwrap_or_default();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::marketplace::listing::{normalize, RawListing};
    use crate::kernel::memory_store::MemoryListingStore;
    use crate::kernel::test_dependencies::TestDependencies;
    use chrono::Utc;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stored_deals_come_from_below_floor_query() {
        let mut store = MemoryListingStore::new();
        for i in 0..5 {
            let raw = RawListing::new(format!("full{}.eth", i), "2").with_floor_price("1");
            store = store.with_listing(&normalize(&raw, Utc::now()), "Vision");
        }
        let deal = RawListing::new("steal.eth", "0.25").with_floor_price("1");
        store = store.with_listing(&normalize(&deal, Utc::now()), "OpenSea");

        let deps = TestDependencies::new()
            .listing_store(Arc::new(store))
            .into_server_deps();
        let report = analyze_stored_deals(&deps, &DealCriteria::default())
            .await
            .unwrap();

        assert_eq!(report.listings_considered, 6);
        assert_eq!(report.deals_found, 1);
        assert_eq!(report.best_deal.unwrap().domain_name, "steal.eth");
    }
}
