// ENS Deal Scout - API Core
//
// Collects ENS domain marketplace listings through Firecrawl, normalizes them,
// stores them, and exposes deal analysis and valuation over HTTP and as agent
// actions.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
