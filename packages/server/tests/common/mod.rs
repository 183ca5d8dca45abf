// Common test utilities

pub mod harness;

pub use harness::*;

use ens_deals::domains::marketplace::listing::{normalize, NormalizedListing, RawListing};

/// Normalized listing scraped now, with an optional floor.
pub fn listing(name: &str, price: &str, floor: Option<&str>) -> NormalizedListing {
    let mut raw = RawListing::new(name, price);
    if let Some(floor) = floor {
        raw = raw.with_floor_price(floor);
    }
    normalize(&raw, chrono::Utc::now())
}
