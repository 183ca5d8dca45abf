use serde::{Deserialize, Serialize};

/// Output formats Firecrawl can return for a scraped page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeFormat {
    Markdown,
    Html,
    Links,
    Extract,
}

/// LLM extraction options sent with `formats: ["extract"]`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
}

/// Body of `POST /v1/scrape`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    pub formats: Vec<ScrapeFormat>,
    /// Milliseconds to wait for the page to settle before scraping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for: Option<u64>,
    /// Server-side timeout in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_main_content: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractOptions>,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            formats: vec![ScrapeFormat::Markdown],
            wait_for: None,
            timeout: None,
            include_tags: Vec::new(),
            only_main_content: None,
            extract: None,
        }
    }

    pub fn with_formats(mut self, formats: Vec<ScrapeFormat>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_wait_for(mut self, millis: u64) -> Self {
        self.wait_for = Some(millis);
        self
    }

    pub fn with_timeout(mut self, millis: u64) -> Self {
        self.timeout = Some(millis);
        self
    }

    pub fn with_include_tags(mut self, tags: Vec<String>) -> Self {
        self.include_tags = tags;
        self
    }

    pub fn with_only_main_content(mut self, only_main_content: bool) -> Self {
        self.only_main_content = Some(only_main_content);
        self
    }

    pub fn with_extract(mut self, extract: ExtractOptions) -> Self {
        self.extract = Some(extract);
        self
    }
}

/// Response of `POST /v1/scrape`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub data: Option<ScrapeData>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapeData {
    pub markdown: Option<String>,
    pub html: Option<String>,
    /// Structured extraction output; shape depends on the requested schema.
    pub extract: Option<serde_json::Value>,
    pub metadata: Option<PageMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: Option<String>,
    #[serde(rename = "sourceURL")]
    pub source_url: Option<String>,
    pub status_code: Option<u16>,
}
