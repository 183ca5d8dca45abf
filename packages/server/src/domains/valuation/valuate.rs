//! Heuristic ENS name valuation.
//!
//! Estimates start from a length-based base price, get adjusted for
//! character class, and are blended with the median price of stored
//! listings whose labels have the same length.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::domains::marketplace::listing::NormalizedListing;

lazy_static! {
    static ref LABEL_REGEX: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
}

/// ENS does not register labels shorter than this.
pub const MIN_LABEL_LENGTH: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValuationError {
    #[error("invalid ENS name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("failed to load comparable listings: {0}")]
    Comparables(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Valuation {
    pub name: String,
    pub label_length: usize,
    pub estimated_value_eth: f64,
    pub factors: Vec<String>,
    pub comparable_count: usize,
    pub confidence: Confidence,
}

/// Lowercase, trim and ensure a `.eth` suffix; returns `(name, label)`.
pub fn parse_ens_name(input: &str) -> Result<(String, String), ValuationError> {
    let trimmed = input.trim().to_lowercase();
    let label = trimmed.strip_suffix(".eth").unwrap_or(&trimmed).to_string();
    let name = format!("{}.eth", label);

    let invalid = |reason: &str| ValuationError::InvalidName {
        name: name.clone(),
        reason: reason.to_string(),
    };

    if label.is_empty() {
        return Err(invalid("label is empty"));
    }
    if !LABEL_REGEX.is_match(&label) {
        return Err(invalid("only a-z, 0-9 and '-' are supported"));
    }
    if label.chars().count() < MIN_LABEL_LENGTH {
        return Err(invalid("labels need at least 3 characters"));
    }

    Ok((name, label))
}

fn base_value(length: usize) -> f64 {
    match length {
        3 => 5.0,
        4 => 1.0,
        5 => 0.3,
        _ => 0.05,
    }
}

fn label_of(domain_name: &str) -> &str {
    domain_name.strip_suffix(".eth").unwrap_or(domain_name)
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Estimate a name's value in ETH against the given comparable listings.
pub fn valuate(input: &str, comparables: &[NormalizedListing]) -> Result<Valuation, ValuationError> {
    let (name, label) = parse_ens_name(input)?;
    let length = label.chars().count();

    let mut factors = Vec::new();
    let mut estimate = base_value(length);
    factors.push(format!("{}-character label: base {} ETH", length, estimate));

    if label.chars().all(|c| c.is_ascii_digit()) {
        estimate *= 3.0;
        factors.push(format!("{}-digit club: x3.0", length));
    } else if label.chars().all(|c| c.is_ascii_lowercase()) {
        estimate *= 1.2;
        factors.push("letters only: x1.2".to_string());
    }
    if label.contains('-') {
        estimate *= 0.5;
        factors.push("contains hyphen: x0.5".to_string());
    }

    let mut comparable_prices: Vec<f64> = comparables
        .iter()
        .filter(|l| l.price > 0.0 && label_of(&l.domain_name).chars().count() == length)
        .filter(|l| l.domain_name != name)
        .map(|l| l.price)
        .collect();
    let comparable_count = comparable_prices.len();

    if let Some(median_price) = median(&mut comparable_prices) {
        estimate = (estimate + median_price) / 2.0;
        factors.push(format!(
            "blended with median of {} comparable listing(s): {} ETH",
            comparable_count, median_price
        ));
    }

    let confidence = match comparable_count {
        0 => Confidence::Low,
        1..=4 => Confidence::Medium,
        _ => Confidence::High,
    };

    Ok(Valuation {
        name,
        label_length: length,
        estimated_value_eth: (estimate * 10_000.0).round() / 10_000.0,
        factors,
        comparable_count,
        confidence,
    })
}
