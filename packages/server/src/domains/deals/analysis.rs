use serde::{Deserialize, Serialize};

use crate::domains::marketplace::listing::NormalizedListing;

/// Filters applied when ranking deals.
#[derive(Debug, Clone, Deserialize)]
pub struct DealCriteria {
    #[serde(default)]
    pub min_discount_pct: f64,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

impl Default for DealCriteria {
    fn default() -> Self {
        Self {
            min_discount_pct: 0.0,
            max_price: None,
            limit: default_limit(),
        }
    }
}

/// A listing priced under its floor.
#[derive(Debug, Clone, Serialize)]
pub struct Deal {
    pub domain_name: String,
    pub price: f64,
    pub floor_price: f64,
    pub discount_pct: f64,
    pub listed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DealReport {
    pub listings_considered: usize,
    pub deals_found: usize,
    pub average_discount_pct: Option<f64>,
    pub best_deal: Option<Deal>,
    pub deals: Vec<Deal>,
}

/// Rank below-floor listings by discount, deepest first.
///
/// `deals_found` counts every matching deal; `deals` is truncated to `criteria.limit`.
pub fn analyze_deals(listings: &[NormalizedListing], criteria: &DealCriteria) -> DealReport {
    let mut deals: Vec<Deal> = listings
        .iter()
        .filter_map(|listing| {
            let discount_pct = listing.discount_pct()?;
            Some(Deal {
                domain_name: listing.domain_name.clone(),
                price: listing.price,
                floor_price: listing.floor_price?,
                discount_pct,
                listed_at: listing.listed_at.clone(),
            })
        })
        .filter(|deal| deal.discount_pct >= criteria.min_discount_pct)
        .filter(|deal| criteria.max_price.map_or(true, |max| deal.price <= max))
        .collect();

    deals.sort_by(|a, b| {
        b.discount_pct
            .total_cmp(&a.discount_pct)
            .then_with(|| a.price.total_cmp(&b.price))
            .then_with(|| a.domain_name.cmp(&b.domain_name))
    });

    let deals_found = deals.len();
    let average_discount_pct = if deals.is_empty() {
        None
    } else {
        Some(deals.iter().map(|d| d.discount_pct).sum::<f64>() / deals.len() as f64)
    };

    deals.truncate(criteria.limit);

    DealReport {
        listings_considered: listings.len(),
        deals_found,
        average_discount_pct,
        best_deal: deals.first().cloned(),
        deals,
    }
}
