//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod ens_registry;
pub mod firecrawl_scraper;
pub mod memory_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use ens_registry::{DomainInfo, EnsSubgraphClient};
pub use firecrawl_scraper::FirecrawlListingScraper;
pub use memory_store::MemoryListingStore;
pub use test_dependencies::TestDependencies;
pub use traits::*;
