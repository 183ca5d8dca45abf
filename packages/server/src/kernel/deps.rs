//! Server dependencies (using traits for testability)
//!
//! Central dependency container handed to domain functions, HTTP handlers and
//! agent actions. Everything the scrape routine needs (API client, target
//! list, output sink) is passed in here rather than looked up globally.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crate::config::Config;
use crate::domains::marketplace::models::PgListingStore;
use crate::domains::marketplace::scraper::ScrapeOptions;
use crate::domains::marketplace::targets::{default_targets, MarketplaceTarget};
use crate::kernel::ens_registry::EnsSubgraphClient;
use crate::kernel::firecrawl_scraper::FirecrawlListingScraper;
use crate::kernel::memory_store::MemoryListingStore;
use crate::kernel::{BaseDomainRegistry, BaseListingScraper, BaseListingStore};

#[derive(Clone)]
pub struct ServerDeps {
    pub scraper: Arc<dyn BaseListingScraper>,
    pub store: Arc<dyn BaseListingStore>,
    pub registry: Arc<dyn BaseDomainRegistry>,
    /// Marketplaces in priority order
    pub targets: Arc<Vec<MarketplaceTarget>>,
    pub scrape_options: ScrapeOptions,
}

impl ServerDeps {
    pub fn new(
        scraper: Arc<dyn BaseListingScraper>,
        store: Arc<dyn BaseListingStore>,
        registry: Arc<dyn BaseDomainRegistry>,
        targets: Vec<MarketplaceTarget>,
        scrape_options: ScrapeOptions,
    ) -> Self {
        Self {
            scraper,
            store,
            registry,
            targets: Arc::new(targets),
            scrape_options,
        }
    }

    /// Wire real services from configuration.
    ///
    /// Connects to Postgres and runs migrations when `DATABASE_URL` is set,
    /// otherwise listings live in memory.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let scraper = Arc::new(FirecrawlListingScraper::new(
            config.firecrawl_api_key.clone(),
            &config.firecrawl_api_url,
        ));

        let store: Arc<dyn BaseListingStore> = match &config.database_url {
            Some(database_url) => {
                tracing::info!("Connecting to database...");
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(database_url)
                    .await
                    .context("Failed to connect to database")?;

                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run migrations")?;

                Arc::new(PgListingStore::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, listings are kept in memory only");
                Arc::new(MemoryListingStore::new())
            }
        };

        let registry = Arc::new(EnsSubgraphClient::new(config.ens_subgraph_url.clone()));

        Ok(Self::new(
            scraper,
            store,
            registry,
            default_targets(),
            ScrapeOptions {
                probe: config.scrape_probe,
            },
        ))
    }
}
