//! Listing records as scraped and as normalized.
//!
//! Scraped listings arrive as free-form text ("1.5 ETH", "Ξ 0.42", "$3,100").
//! Normalization pulls the first decimal numeral out of each price field and
//! compares the asking price against the floor. Units are not interpreted, so
//! "1.5 ETH" and "1.5 USD" both become `1.5`.

use chrono::{DateTime, SecondsFormat, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

lazy_static! {
    static ref DECIMAL_REGEX: Regex = Regex::new(r"\d+(?:\.\d+)?").unwrap();
}

/// Metadata key holding the time the listing was scraped.
pub const SCRAPED_AT_KEY: &str = "scraped_at";

/// A listing as returned by the scraping API. Only `domainName` and `price` are required.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    pub domain_name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub price: String,
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub floor_price: Option<String>,
    #[serde(default)]
    pub listed_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl RawListing {
    pub fn new(domain_name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            price: price.into(),
            floor_price: None,
            listed_at: None,
            metadata: None,
        }
    }

    pub fn with_floor_price(mut self, floor_price: impl Into<String>) -> Self {
        self.floor_price = Some(floor_price.into());
        self
    }

    pub fn with_listed_at(mut self, listed_at: impl Into<String>) -> Self {
        self.listed_at = Some(listed_at.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Decode one element of a scrape response.
    ///
    /// Blank domain names are rejected along with structurally invalid objects.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let listing: RawListing = serde_json::from_value(value)?;
        if listing.domain_name.trim().is_empty() {
            return Err(serde::de::Error::custom("domainName is empty"));
        }
        Ok(listing)
    }
}

/// A listing with typed price fields, ready for display or persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedListing {
    pub domain_name: String,
    pub price: f64,
    pub floor_price: Option<f64>,
    pub is_below_floor: bool,
    /// RFC 3339 timestamp in UTC.
    pub listed_at: String,
    pub metadata: Map<String, Value>,
}

impl NormalizedListing {
    /// Discount against the floor in percent, when the listing is below floor.
    pub fn discount_pct(&self) -> Option<f64> {
        match self.floor_price {
            Some(floor) if self.is_below_floor && floor > 0.0 => {
                Some((floor - self.price) / floor * 100.0)
            }
            _ => None,
        }
    }

    pub fn listed_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.listed_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// First decimal numeral anywhere in `text`, e.g. `"Ξ 2.5 ETH"` yields `2.5`.
///
/// Numerals too large to represent as a finite `f64` yield `None`.
pub fn extract_leading_decimal(text: Option<&str>) -> Option<f64> {
    let text = text?;
    DECIMAL_REGEX
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Convert a raw listing into typed fields, stamping it with `scraped_at`.
///
/// A price without a numeral is stored as `0.0` but never counts as below floor.
pub fn normalize(raw: &RawListing, scraped_at: DateTime<Utc>) -> NormalizedListing {
    let parsed_price = extract_leading_decimal(Some(&raw.price));
    let floor_price = extract_leading_decimal(raw.floor_price.as_deref());
    let is_below_floor = matches!(
        (parsed_price, floor_price),
        (Some(price), Some(floor)) if price < floor
    );
    let price = parsed_price.unwrap_or(0.0);

    let listed_at = raw
        .listed_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(scraped_at);

    let mut metadata = raw.metadata.clone().unwrap_or_default();
    metadata.insert(
        SCRAPED_AT_KEY.to_string(),
        Value::String(format_timestamp(scraped_at)),
    );

    NormalizedListing {
        domain_name: raw.domain_name.trim().to_lowercase(),
        price,
        floor_price,
        is_below_floor,
        listed_at: format_timestamp(listed_at),
        metadata,
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn optional_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
