// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::memory_store::MemoryListingStore;
use super::{
    BaseDomainRegistry, BaseListingScraper, BaseListingStore, DomainInfo, ServerDeps,
};
use crate::domains::marketplace::error::TargetError;
use crate::domains::marketplace::scraper::ScrapeOptions;
use crate::domains::marketplace::targets::{default_targets, MarketplaceTarget};

// =============================================================================
// Mock Listing Scraper
// =============================================================================

/// Canned per-target responses, keyed by target name.
///
/// Targets without a configured response return an empty listing set.
pub struct MockListingScraper {
    responses: Arc<Mutex<HashMap<String, Result<Vec<Value>, TargetError>>>>,
    probe_result: Result<(), TargetError>,
    probe_calls: Arc<Mutex<usize>>,
    scrape_calls: Arc<Mutex<Vec<String>>>,
}

impl MockListingScraper {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            probe_result: Ok(()),
            probe_calls: Arc::new(Mutex::new(0)),
            scrape_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_listings(self, target: &str, listings: Vec<Value>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(target.to_string(), Ok(listings));
        self
    }

    pub fn with_failure(self, target: &str, error: TargetError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(target.to_string(), Err(error));
        self
    }

    pub fn with_probe_failure(mut self, error: TargetError) -> Self {
        self.probe_result = Err(error);
        self
    }

    /// Target names in the order they were scraped
    pub fn scrape_calls(&self) -> Vec<String> {
        self.scrape_calls.lock().unwrap().clone()
    }

    pub fn probe_count(&self) -> usize {
        *self.probe_calls.lock().unwrap()
    }
}

impl Default for MockListingScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseListingScraper for MockListingScraper {
    async fn probe(&self) -> Result<(), TargetError> {
        *self.probe_calls.lock().unwrap() += 1;
        self.probe_result.clone()
    }

    async fn scrape_target(&self, target: &MarketplaceTarget) -> Result<Vec<Value>, TargetError> {
        self.scrape_calls.lock().unwrap().push(target.name.clone());
        self.responses
            .lock()
            .unwrap()
            .get(&target.name)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// =============================================================================
// Mock Domain Registry
// =============================================================================

pub struct MockDomainRegistry {
    domains: Arc<Mutex<HashMap<String, DomainInfo>>>,
    fail: bool,
}

impl MockDomainRegistry {
    pub fn new() -> Self {
        Self {
            domains: Arc::new(Mutex::new(HashMap::new())),
            fail: false,
        }
    }

    pub fn with_domain(self, info: DomainInfo) -> Self {
        self.domains.lock().unwrap().insert(info.name.clone(), info);
        self
    }

    /// Every lookup returns an error
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl Default for MockDomainRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDomainRegistry for MockDomainRegistry {
    async fn lookup(&self, name: &str) -> anyhow::Result<Option<DomainInfo>> {
        if self.fail {
            anyhow::bail!("mock registry unavailable");
        }
        Ok(self.domains.lock().unwrap().get(name).cloned())
    }
}

// =============================================================================
// TestDependencies builder
// =============================================================================

pub struct TestDependencies {
    pub scraper: Arc<dyn BaseListingScraper>,
    pub store: Arc<dyn BaseListingStore>,
    pub registry: Arc<dyn BaseDomainRegistry>,
    pub targets: Vec<MarketplaceTarget>,
    pub scrape_options: ScrapeOptions,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            scraper: Arc::new(MockListingScraper::new()),
            store: Arc::new(MemoryListingStore::new()),
            registry: Arc::new(MockDomainRegistry::new()),
            targets: default_targets(),
            scrape_options: ScrapeOptions::default(),
        }
    }

    pub fn mock_scraper(mut self, scraper: MockListingScraper) -> Self {
        self.scraper = Arc::new(scraper);
        self
    }

    /// Share a scraper handle so the test can inspect calls afterwards
    pub fn shared_scraper(mut self, scraper: Arc<MockListingScraper>) -> Self {
        self.scraper = scraper;
        self
    }

    pub fn listing_store(mut self, store: Arc<MemoryListingStore>) -> Self {
        self.store = store;
        self
    }

    pub fn mock_registry(mut self, registry: MockDomainRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn targets(mut self, targets: Vec<MarketplaceTarget>) -> Self {
        self.targets = targets;
        self
    }

    pub fn into_server_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.scraper,
            self.store,
            self.registry,
            self.targets,
            self.scrape_options,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
