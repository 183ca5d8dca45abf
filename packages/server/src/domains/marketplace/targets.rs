use serde::Serialize;

/// Selector expressions describing where listing fields live on a marketplace page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorSet {
    pub listings: String,
    pub domain_name: String,
    pub price: String,
    pub floor_price: String,
}

/// One candidate marketplace to scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketplaceTarget {
    pub name: String,
    pub url: String,
    pub selectors: SelectorSet,
}

impl MarketplaceTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>, selectors: SelectorSet) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            selectors,
        }
    }
}

/// Marketplaces in priority order: primary source first, fallbacks after.
pub fn default_targets() -> Vec<MarketplaceTarget> {
    vec![
        MarketplaceTarget::new(
            "Vision",
            "https://vision.io/marketplace/ens",
            SelectorSet {
                listings: "[data-testid='listing-card']".to_string(),
                domain_name: "[data-testid='domain-name']".to_string(),
                price: "[data-testid='listing-price']".to_string(),
                floor_price: "[data-testid='floor-price']".to_string(),
            },
        ),
        MarketplaceTarget::new(
            "OpenSea",
            "https://opensea.io/collection/ens",
            SelectorSet {
                listings: "article[role='gridcell']".to_string(),
                domain_name: "[data-testid='ItemCardFooter-name']".to_string(),
                price: "[data-testid='ItemCardPrice']".to_string(),
                floor_price: "[data-testid='collection-stats-floor-price']".to_string(),
            },
        ),
        MarketplaceTarget::new(
            "ENS.Vision",
            "https://ens.vision/",
            SelectorSet {
                listings: ".domain-listing".to_string(),
                domain_name: ".domain-name".to_string(),
                price: ".price".to_string(),
                floor_price: ".floor-price".to_string(),
            },
        ),
    ]
}
