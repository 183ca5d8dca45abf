//! Scrape-with-fallback across marketplace targets.
//!
//! Targets are tried strictly in order, once each. The first target that
//! yields at least one valid listing wins and the rest are never contacted.
//! Per-target failures are recorded and logged but never abort the walk;
//! only a failed connectivity probe or total exhaustion reach the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::{ScrapeError, TargetError, TargetFailure};
use super::listing::{normalize, NormalizedListing, RawListing};
use super::targets::MarketplaceTarget;
use crate::kernel::BaseListingScraper;

#[derive(Debug, Clone, Copy)]
pub struct ScrapeOptions {
    /// Check the scraping service is reachable before trying any target.
    pub probe: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self { probe: true }
    }
}

/// Result of a successful walk.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeWin {
    pub target: MarketplaceTarget,
    pub listings: Vec<NormalizedListing>,
    /// Failures recorded for targets tried before the winner.
    #[serde(skip)]
    pub failures: Vec<TargetFailure>,
    /// Listings in the winning response that could not be decoded.
    pub skipped: usize,
    pub scraped_at: DateTime<Utc>,
}

/// Try each target in order until one returns listings.
pub async fn scrape_first_available(
    scraper: &dyn BaseListingScraper,
    targets: &[MarketplaceTarget],
    options: ScrapeOptions,
) -> Result<ScrapeWin, ScrapeError> {
    if options.probe {
        if let Err(e) = scraper.probe().await {
            warn!(error = %e, "Scraping service connectivity probe failed");
            return Err(ScrapeError::Connectivity {
                reason: e.to_string(),
            });
        }
        debug!("Scraping service connectivity probe passed");
    }

    let mut failures: Vec<TargetFailure> = Vec::new();

    for target in targets {
        info!(target = %target.name, url = %target.url, "Scraping marketplace");

        let values = match scraper.scrape_target(target).await {
            Ok(values) => values,
            Err(error) => {
                warn!(target = %target.name, error = %error, "Marketplace scrape failed");
                failures.push(TargetFailure {
                    target: target.name.clone(),
                    error,
                });
                continue;
            }
        };

        if values.is_empty() {
            info!(target = %target.name, "Marketplace returned no listings");
            failures.push(TargetFailure {
                target: target.name.clone(),
                error: TargetError::Empty,
            });
            continue;
        }

        let total = values.len();
        let raw = decode_listings(&target.name, values);
        if raw.is_empty() {
            warn!(target = %target.name, total, "Every listing in the response was malformed");
            failures.push(TargetFailure {
                target: target.name.clone(),
                error: TargetError::Malformed(format!("all {} listings malformed", total)),
            });
            continue;
        }

        let scraped_at = Utc::now();
        let listings: Vec<NormalizedListing> =
            raw.iter().map(|r| normalize(r, scraped_at)).collect();

        info!(
            target = %target.name,
            listings = listings.len(),
            skipped = total - raw.len(),
            "Marketplace scrape succeeded"
        );

        return Ok(ScrapeWin {
            target: target.clone(),
            skipped: total - listings.len(),
            listings,
            failures,
            scraped_at,
        });
    }

    Err(ScrapeError::Exhausted {
        attempts: failures.len(),
        last_error: failures.pop(),
    })
}

/// Decode raw listing objects, skipping (and logging) the ones that don't fit.
fn decode_listings(target: &str, values: Vec<serde_json::Value>) -> Vec<RawListing> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match RawListing::from_value(value) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!(target = %target, index, error = %e, "Skipping malformed listing");
                None
            }
        })
        .collect()
}
