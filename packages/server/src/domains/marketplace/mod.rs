//! Marketplace domain - scraping ENS listings with ordered fallback.

pub mod collect;
pub mod error;
pub mod listing;
pub mod models;
pub mod sample;
pub mod scraper;
pub mod targets;

pub use collect::{collect_listings, CollectReport, FailedTarget};
pub use error::{ScrapeError, TargetError, TargetFailure, DIRECT_SOURCE_GUIDANCE};
pub use listing::{extract_leading_decimal, normalize, NormalizedListing, RawListing};
pub use scraper::{scrape_first_available, ScrapeOptions, ScrapeWin};
pub use targets::{default_targets, MarketplaceTarget, SelectorSet};
