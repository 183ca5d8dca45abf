// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (fallback ordering, normalization, deal analysis) lives in
// domain functions that take these traits as parameters.
//
// Naming convention: Base* for trait names (e.g., BaseListingScraper)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::marketplace::error::TargetError;
use crate::domains::marketplace::listing::NormalizedListing;
use crate::domains::marketplace::models::EnsListing;
use crate::domains::marketplace::targets::MarketplaceTarget;
use crate::kernel::ens_registry::DomainInfo;

// =============================================================================
// Listing Scraper Trait (Infrastructure - one scrape per call, no fallback)
// =============================================================================

#[async_trait]
pub trait BaseListingScraper: Send + Sync {
    /// Cheap request proving the scraping service is reachable and authorized.
    async fn probe(&self) -> std::result::Result<(), TargetError>;

    /// Scrape one marketplace. Returns the raw listing objects, possibly empty.
    async fn scrape_target(
        &self,
        target: &MarketplaceTarget,
    ) -> std::result::Result<Vec<serde_json::Value>, TargetError>;
}

// =============================================================================
// Listing Store Trait (Infrastructure - output sink for normalized listings)
// =============================================================================

#[async_trait]
pub trait BaseListingStore: Send + Sync {
    /// Insert or update the listing keyed by its domain name.
    async fn upsert(&self, listing: &NormalizedListing, source: &str) -> Result<EnsListing>;

    /// Most recently updated listings first.
    async fn find_all(&self, limit: i64) -> Result<Vec<EnsListing>>;

    /// Listings priced under their floor, deepest discount first.
    async fn find_below_floor(&self, limit: i64) -> Result<Vec<EnsListing>>;

    /// Number of stored listings.
    async fn count(&self) -> Result<i64>;

    async fn find_by_domain(&self, domain_name: &str) -> Result<Option<EnsListing>>;

    /// Verify the backing store answers.
    async fn ping(&self) -> Result<()>;

    /// Short backend name for health output.
    fn backend(&self) -> &'static str;
}

// =============================================================================
// Domain Registry Trait (Infrastructure - single-domain ENS lookups)
// =============================================================================

#[async_trait]
pub trait BaseDomainRegistry: Send + Sync {
    /// Look up one `.eth` name. `Ok(None)` when the name is not registered.
    async fn lookup(&self, name: &str) -> Result<Option<DomainInfo>>;
}
