use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::kernel::ens_registry::DEFAULT_ENS_SUBGRAPH_URL;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub firecrawl_api_key: String,
    pub firecrawl_api_url: String,
    /// Without a database, listings are kept in memory for the life of the process.
    pub database_url: Option<String>,
    pub ens_subgraph_url: String,
    pub port: u16,
    /// Probe Firecrawl connectivity before walking the marketplace targets.
    pub scrape_probe: bool,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            firecrawl_api_key: env::var("FIRECRAWL_API_KEY")
                .context("FIRECRAWL_API_KEY must be set")?,
            firecrawl_api_url: env::var("FIRECRAWL_API_URL")
                .unwrap_or_else(|_| firecrawl_client::DEFAULT_BASE_URL.to_string()),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            ens_subgraph_url: env::var("ENS_SUBGRAPH_URL")
                .unwrap_or_else(|_| DEFAULT_ENS_SUBGRAPH_URL.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            scrape_probe: parse_bool(
                &env::var("SCRAPE_PROBE").unwrap_or_else(|_| "true".to_string()),
            )
            .context("SCRAPE_PROBE must be true or false")?,
            allowed_origins: parse_origins(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("invalid boolean: {}", other)),
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
