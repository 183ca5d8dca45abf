//! Pure Firecrawl REST API client.
//!
//! A minimal client for the Firecrawl `/v1/scrape` endpoint, plus a cheap
//! connectivity probe used to tell "service unreachable" apart from "page
//! had nothing on it".
//!
//! # Example
//!
//! ```rust,ignore
//! use firecrawl_client::{FirecrawlClient, ScrapeRequest};
//!
//! let client = FirecrawlClient::new("fc-your-key".into());
//! let page = client.scrape(&ScrapeRequest::new("https://example.com")).await?;
//! println!("{}", page.markdown.unwrap_or_default());
//! ```

pub mod error;
pub mod types;

pub use error::{FirecrawlError, Result};
pub use types::{
    ExtractOptions, PageMetadata, ScrapeData, ScrapeFormat, ScrapeRequest, ScrapeResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev";

/// Page scraped by [`FirecrawlClient::probe`].
pub const PROBE_URL: &str = "https://example.com";

/// Server-side timeout for the probe, in milliseconds.
const PROBE_TIMEOUT_MS: u64 = 15_000;

#[derive(Clone)]
pub struct FirecrawlClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl FirecrawlClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API host (self-hosted Firecrawl, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Scrape a single page. Returns the `data` block of a successful response.
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeData> {
        let url = format!("{}/v1/scrape", self.base_url);
        tracing::debug!(target_url = %request.url, formats = ?request.formats, "Firecrawl scrape");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(FirecrawlError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ScrapeResponse = serde_json::from_str(&body)?;
        if !parsed.success {
            return Err(FirecrawlError::Unsuccessful(
                parsed
                    .error
                    .unwrap_or_else(|| "no error message returned".to_string()),
            ));
        }

        Ok(parsed.data.unwrap_or_default())
    }

    /// Scrape a trivial page to confirm the API is reachable and the key works.
    pub async fn probe(&self) -> Result<()> {
        let request = ScrapeRequest::new(PROBE_URL).with_timeout(PROBE_TIMEOUT_MS);
        self.scrape(&request).await?;
        tracing::debug!(base_url = %self.base_url, "Firecrawl probe succeeded");
        Ok(())
    }
}
