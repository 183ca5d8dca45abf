use async_trait::async_trait;
use firecrawl_client::{ExtractOptions, FirecrawlClient, FirecrawlError, ScrapeFormat, ScrapeRequest};
use serde_json::{json, Value};

use super::BaseListingScraper;
use crate::domains::marketplace::error::TargetError;
use crate::domains::marketplace::targets::MarketplaceTarget;

/// Server-side timeout passed to Firecrawl for each marketplace page (ms).
pub const SCRAPE_TIMEOUT_MS: u64 = 30_000;

/// Time Firecrawl waits for client-rendered listings to appear (ms).
const WAIT_FOR_MS: u64 = 3_000;

/// Firecrawl implementation of BaseListingScraper
pub struct FirecrawlListingScraper {
    client: FirecrawlClient,
}

impl FirecrawlListingScraper {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            client: FirecrawlClient::new(api_key).with_base_url(base_url),
        }
    }

    /// Scrape request for a marketplace: JS wait, selector hints, listing schema.
    pub fn build_request(target: &MarketplaceTarget) -> ScrapeRequest {
        let selectors = &target.selectors;
        let prompt = format!(
            "Extract every ENS domain listed for sale. Listings are in elements matching `{}`; \
             within each, the domain name is at `{}`, the asking price at `{}`. \
             The collection floor price is shown at `{}`. Keep prices as displayed, including units.",
            selectors.listings, selectors.domain_name, selectors.price, selectors.floor_price
        );

        ScrapeRequest::new(target.url.clone())
            .with_formats(vec![ScrapeFormat::Extract])
            .with_wait_for(WAIT_FOR_MS)
            .with_timeout(SCRAPE_TIMEOUT_MS)
            .with_include_tags(vec![selectors.listings.clone(), selectors.floor_price.clone()])
            .with_extract(ExtractOptions {
                prompt: Some(prompt),
                schema: Some(listing_schema()),
            })
    }

    /// Pull the listing array out of the `extract` block.
    ///
    /// A missing `extract` block or a non-array `listings` is malformed; a
    /// missing or null `listings` means the page simply had none.
    pub fn listings_from_extract(extract: Option<Value>) -> Result<Vec<Value>, TargetError> {
        let extract = extract.ok_or_else(|| {
            TargetError::Malformed("response has no extract block".to_string())
        })?;

        let Value::Object(mut fields) = extract else {
            return Err(TargetError::Malformed(
                "extract block is not an object".to_string(),
            ));
        };

        match fields.remove("listings") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(listings)) => Ok(listings),
            Some(other) => Err(TargetError::Malformed(format!(
                "listings is not an array: {}",
                other
            ))),
        }
    }
}

fn listing_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "listings": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "domainName": { "type": "string" },
                        "price": { "type": "string" },
                        "floorPrice": { "type": "string" },
                        "listedAt": { "type": "string" }
                    },
                    "required": ["domainName", "price"]
                }
            }
        },
        "required": ["listings"]
    })
}

impl From<FirecrawlError> for TargetError {
    fn from(err: FirecrawlError) -> Self {
        match err {
            FirecrawlError::Api { status, message } => TargetError::Http { status, message },
            FirecrawlError::Http(e) => match e.status() {
                Some(status) => TargetError::Http {
                    status: status.as_u16(),
                    message: e.to_string(),
                },
                None => TargetError::Transport(e.to_string()),
            },
            FirecrawlError::Decode(e) => TargetError::Malformed(e.to_string()),
            FirecrawlError::Unsuccessful(message) => TargetError::Unsuccessful(message),
        }
    }
}

#[async_trait]
impl BaseListingScraper for FirecrawlListingScraper {
    async fn probe(&self) -> Result<(), TargetError> {
        self.client.probe().await.map_err(TargetError::from)
    }

    async fn scrape_target(&self, target: &MarketplaceTarget) -> Result<Vec<Value>, TargetError> {
        let request = Self::build_request(target);
        let data = self.client.scrape(&request).await?;
        Self::listings_from_extract(data.extract)
    }
}
