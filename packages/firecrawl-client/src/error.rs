use thiserror::Error;

/// Errors returned by the Firecrawl client.
#[derive(Debug, Error)]
pub enum FirecrawlError {
    /// The request never produced a response (DNS, TLS, connection reset, ...).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Firecrawl answered with a non-success status code.
    #[error("Firecrawl API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not the JSON shape we expect.
    #[error("failed to decode Firecrawl response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded but reported `success: false`.
    #[error("Firecrawl reported failure: {0}")]
    Unsuccessful(String),
}

impl FirecrawlError {
    /// Status code for API errors, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FirecrawlError::Api { status, .. } => Some(*status),
            FirecrawlError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the API key was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

pub type Result<T> = std::result::Result<T, FirecrawlError>;
