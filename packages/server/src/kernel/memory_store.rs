//! In-memory listing store.
//!
//! Used when no database is configured and as the store in tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domains::marketplace::listing::NormalizedListing;
use crate::domains::marketplace::models::EnsListing;
use crate::kernel::BaseListingStore;

#[derive(Default, Clone)]
pub struct MemoryListingStore {
    listings: Arc<RwLock<HashMap<String, EnsListing>>>,
    fail_upserts: bool,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upsert fail (for exercising error paths).
    pub fn failing_upserts(mut self) -> Self {
        self.fail_upserts = true;
        self
    }

    /// Seed the store directly (builder pattern).
    pub fn with_listing(self, listing: &NormalizedListing, source: &str) -> Self {
        self.insert(listing, source);
        self
    }

    pub fn len(&self) -> usize {
        self.listings.read().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, listing: &NormalizedListing, source: &str) -> EnsListing {
        let now = Utc::now();
        let mut row = EnsListing::from_normalized(listing, source, now);
        let mut listings = self
            .listings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(existing) = listings.get(&row.domain_name) {
            row.id = existing.id;
            row.created_at = existing.created_at;
        }
        listings.insert(row.domain_name.clone(), row.clone());
        row
    }
}

#[async_trait]
impl BaseListingStore for MemoryListingStore {
    async fn upsert(&self, listing: &NormalizedListing, source: &str) -> Result<EnsListing> {
        if self.fail_upserts {
            anyhow::bail!("memory store configured to fail upserts");
        }
        Ok(self.insert(listing, source))
    }

    async fn find_all(&self, limit: i64) -> Result<Vec<EnsListing>> {
        let listings = self
            .listings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut all: Vec<EnsListing> = listings.values().cloned().collect();
        all.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.domain_name.cmp(&b.domain_name))
        });
        all.truncate(limit.max(0) as usize);
        Ok(all)
    }

    async fn find_below_floor(&self, limit: i64) -> Result<Vec<EnsListing>> {
        let listings = self
            .listings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut below: Vec<(f64, EnsListing)> = listings
            .values()
            .filter_map(|row| {
                let discount = row.to_normalized().discount_pct()?;
                Some((discount, row.clone()))
            })
            .collect();
        below.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        below.truncate(limit.max(0) as usize);
        Ok(below.into_iter().map(|(_, row)| row).collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.len() as i64)
    }

    async fn find_by_domain(&self, domain_name: &str) -> Result<Option<EnsListing>> {
        let listings = self
            .listings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(listings.get(&domain_name.trim().to_lowercase()).cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
