//! Chat actions exposed to the agent runtime.
//!
//! Each action decides from the message text whether it applies
//! (`validate`) and produces a plain-text reply (`handle`). Service failures
//! are turned into reply text; only unexpected errors propagate.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::domains::deals::{analyze_stored_deals, DealCriteria, DealReport};
use crate::domains::marketplace::collect::{collect_listings, CollectReport};
use crate::domains::marketplace::error::{ScrapeError, DIRECT_SOURCE_GUIDANCE};
use crate::domains::valuation::{parse_ens_name, valuate_domain, Valuation, ValuationError};
use crate::kernel::{DomainInfo, ServerDeps};

lazy_static! {
    static ref ENS_NAME_REGEX: Regex = Regex::new(r"(?i)\b[a-z0-9-]+\.eth\b").unwrap();
}

/// Deals listed in a scrape reply.
const REPLY_DEAL_COUNT: usize = 5;

#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    /// Alternative names the runtime may match on.
    fn similes(&self) -> &'static [&'static str];

    fn description(&self) -> &'static str;

    fn validate(&self, message: &str) -> bool;

    async fn handle(&self, message: &str, deps: &ServerDeps) -> Result<String>;
}

/// All `.eth` names mentioned in a message, lowercased, in order of appearance.
pub fn extract_ens_names(message: &str) -> Vec<String> {
    ENS_NAME_REGEX
        .find_iter(message)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

fn contains_any(message: &str, needles: &[&str]) -> bool {
    let lower = message.to_lowercase();
    needles.iter().any(|needle| lower.contains(needle))
}

/// ETH amount without trailing zeros, at most 4 decimals.
pub fn fmt_eth(value: f64) -> String {
    let formatted = format!("{:.4}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

// =============================================================================
// SCRAPE_ENS_LISTINGS
// =============================================================================

pub struct ScrapeListingsAction;

impl ScrapeListingsAction {
    fn format_report(report: &CollectReport, deals: &DealReport) -> String {
        let mut reply = format!(
            "Found {} ENS listings on {} ({} below floor, {} saved).",
            report.scraped, report.source, report.below_floor, report.stored
        );
        if !report.failed_targets.is_empty() {
            let skipped: Vec<_> = report
                .failed_targets
                .iter()
                .map(|f| f.target.as_str())
                .collect();
            reply.push_str(&format!(" Skipped: {}.", skipped.join(", ")));
        }
        if !deals.deals.is_empty() {
            reply.push_str("\nTop deals:");
            for deal in &deals.deals {
                reply.push_str(&format!(
                    "\n- {}: {} ETH (floor {} ETH, {:.1}% below)",
                    deal.domain_name,
                    fmt_eth(deal.price),
                    fmt_eth(deal.floor_price),
                    deal.discount_pct
                ));
            }
        }
        reply
    }

    fn format_error(err: &ScrapeError) -> String {
        match err {
            ScrapeError::Connectivity { reason } => format!(
                "The scraping service is unreachable right now ({}). Check the Firecrawl API key. Meanwhile: {}.",
                reason, DIRECT_SOURCE_GUIDANCE
            ),
            ScrapeError::Exhausted { .. } => format!("I couldn't collect any listings: {}.", err),
        }
    }
}

#[async_trait]
impl Action for ScrapeListingsAction {
    fn name(&self) -> &'static str {
        "SCRAPE_ENS_LISTINGS"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["CRAWL_ENS_MARKETPLACE", "FETCH_ENS_LISTINGS", "FIND_ENS_DEALS"]
    }

    fn description(&self) -> &'static str {
        "Scrape ENS marketplaces for domains listed for sale and store them"
    }

    fn validate(&self, message: &str) -> bool {
        contains_any(message, &["scrape", "crawl", "fetch", "collect", "find"])
            && contains_any(message, &["listing", "ens", "domain", "marketplace"])
    }

    async fn handle(&self, _message: &str, deps: &ServerDeps) -> Result<String> {
        let report = match collect_listings(deps).await {
            Ok(report) => report,
            Err(e) => return Ok(Self::format_error(&e)),
        };

        let criteria = DealCriteria {
            limit: REPLY_DEAL_COUNT,
            ..DealCriteria::default()
        };
        let deals = analyze_stored_deals(deps, &criteria).await?;
        Ok(Self::format_report(&report, &deals))
    }
}

// =============================================================================
// ANALYZE_ENS_DEALS
// =============================================================================

pub struct AnalyzeDealsAction;

#[async_trait]
impl Action for AnalyzeDealsAction {
    fn name(&self) -> &'static str {
        "ANALYZE_ENS_DEALS"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["SHOW_ENS_DEALS", "BELOW_FLOOR_ENS"]
    }

    fn description(&self) -> &'static str {
        "Rank stored ENS listings priced below their floor"
    }

    fn validate(&self, message: &str) -> bool {
        contains_any(message, &["deal", "below floor", "undervalued", "analyze", "analyse"])
    }

    async fn handle(&self, _message: &str, deps: &ServerDeps) -> Result<String> {
        let report = analyze_stored_deals(deps, &DealCriteria::default()).await?;

        if report.listings_considered == 0 {
            return Ok("No listings collected yet. Ask me to scrape ENS listings first.".to_string());
        }
        if report.deals.is_empty() {
            return Ok(format!(
                "None of the {} stored listings is below its floor price.",
                report.listings_considered
            ));
        }

        let mut reply = format!(
            "{} of {} listings are below floor (average {:.1}% off):",
            report.deals_found,
            report.listings_considered,
            report.average_discount_pct.unwrap_or_default()
        );
        for deal in &report.deals {
            reply.push_str(&format!(
                "\n- {}: {} ETH vs floor {} ETH ({:.1}% below)",
                deal.domain_name,
                fmt_eth(deal.price),
                fmt_eth(deal.floor_price),
                deal.discount_pct
            ));
        }
        Ok(reply)
    }
}

// =============================================================================
// VALUATE_ENS_DOMAIN
// =============================================================================

pub struct ValuateDomainAction;

impl ValuateDomainAction {
    fn format_valuation(valuation: &Valuation) -> String {
        format!(
            "{} is worth roughly {} ETH ({} confidence, {} comparable listing(s)).\nFactors: {}",
            valuation.name,
            fmt_eth(valuation.estimated_value_eth),
            valuation.confidence,
            valuation.comparable_count,
            valuation.factors.join("; ")
        )
    }
}

#[async_trait]
impl Action for ValuateDomainAction {
    fn name(&self) -> &'static str {
        "VALUATE_ENS_DOMAIN"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["ENS_DOMAIN_VALUE", "PRICE_ENS_DOMAIN"]
    }

    fn description(&self) -> &'static str {
        "Estimate what an ENS name is worth in ETH"
    }

    fn validate(&self, message: &str) -> bool {
        contains_any(message, &["value", "valuat", "worth", "appraise", "price of"])
            && !extract_ens_names(message).is_empty()
    }

    async fn handle(&self, message: &str, deps: &ServerDeps) -> Result<String> {
        let Some(name) = extract_ens_names(message).into_iter().next() else {
            return Ok("Which .eth name should I valuate?".to_string());
        };

        match valuate_domain(deps, &name).await {
            Ok(valuation) => Ok(Self::format_valuation(&valuation)),
            Err(e @ ValuationError::InvalidName { .. }) => Ok(format!("I can't valuate that: {}.", e)),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// GET_ENS_DOMAIN_INFO
// =============================================================================

pub struct DomainInfoAction;

impl DomainInfoAction {
    fn format_info(info: &DomainInfo) -> String {
        let mut reply = format!("{}:", info.name);
        reply.push_str(&format!(
            "\n- owner: {}",
            info.owner.as_deref().unwrap_or("unknown")
        ));
        if let Some(address) = &info.resolved_address {
            reply.push_str(&format!("\n- resolves to: {}", address));
        }
        if let Some(registered_at) = info.registered_at {
            reply.push_str(&format!("\n- registered: {}", registered_at.format("%Y-%m-%d")));
        }
        match info.expires_at {
            Some(expires_at) if info.is_expired(Utc::now()) => {
                reply.push_str(&format!("\n- expired: {}", expires_at.format("%Y-%m-%d")))
            }
            Some(expires_at) => {
                reply.push_str(&format!("\n- expires: {}", expires_at.format("%Y-%m-%d")))
            }
            None => {}
        }
        reply
    }
}

#[async_trait]
impl Action for DomainInfoAction {
    fn name(&self) -> &'static str {
        "GET_ENS_DOMAIN_INFO"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["ENS_LOOKUP", "WHO_OWNS_ENS"]
    }

    fn description(&self) -> &'static str {
        "Look up owner, resolver address and expiry for an ENS name"
    }

    fn validate(&self, message: &str) -> bool {
        contains_any(message, &["info", "owner", "owns", "expir", "lookup", "look up", "whois"])
            && !extract_ens_names(message).is_empty()
    }

    async fn handle(&self, message: &str, deps: &ServerDeps) -> Result<String> {
        let Some(candidate) = extract_ens_names(message).into_iter().next() else {
            return Ok("Which .eth name should I look up?".to_string());
        };
        let name = match parse_ens_name(&candidate) {
            Ok((name, _)) => name,
            Err(e) => return Ok(format!("I can't look that up: {}.", e)),
        };

        match deps.registry.lookup(&name).await {
            Ok(Some(info)) => Ok(Self::format_info(&info)),
            Ok(None) => Ok(format!("{} is not registered.", name)),
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "ENS lookup failed");
                Ok(format!("I couldn't reach the ENS registry to look up {}.", name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_ens_names() {
        assert_eq!(
            extract_ens_names("Is Vitalik.eth worth more than 123.eth?"),
            vec!["vitalik.eth", "123.eth"]
        );
        assert!(extract_ens_names("no names here").is_empty());
    }

    #[test]
    fn test_fmt_eth() {
        assert_eq!(fmt_eth(1.5), "1.5");
        assert_eq!(fmt_eth(2.0), "2");
        assert_eq!(fmt_eth(0.12345), "0.1235");
    }

    #[test]
    fn test_validate_keywords() {
        assert!(ScrapeListingsAction.validate("scrape the latest ENS listings"));
        assert!(!ScrapeListingsAction.validate("hello there"));
        assert!(AnalyzeDealsAction.validate("any deals below floor?"));
        assert!(ValuateDomainAction.validate("what is abc.eth worth?"));
        assert!(!ValuateDomainAction.validate("what is it worth?"));
        assert!(DomainInfoAction.validate("who owns nick.eth"));
    }
}
