//! Typed failures for the marketplace scrape routine.

use thiserror::Error;

/// Shown alongside an exhausted scrape so callers know where to go next.
pub const DIRECT_SOURCE_GUIDANCE: &str =
    "marketplace pages could not be scraped; query a direct data source such as the ENS subgraph or a marketplace API instead";

/// Why a single marketplace target produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("scrape unsuccessful: {0}")]
    Unsuccessful(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no listings found")]
    Empty,
}

/// A recorded per-target failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFailure {
    pub target: String,
    pub error: TargetError,
}

/// Failures surfaced by `scrape_first_available`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    /// The scraping service itself is down or rejected the key. No target was tried.
    #[error("scraping service unreachable: {reason}")]
    Connectivity { reason: String },

    /// Every target failed or came back empty.
    #[error("{}", exhausted_message(.attempts, .last_error))]
    Exhausted {
        attempts: usize,
        last_error: Option<TargetFailure>,
    },
}

impl ScrapeError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ScrapeError::Connectivity { .. })
    }
}

fn exhausted_message(attempts: &usize, last_error: &Option<TargetFailure>) -> String {
    match last_error {
        Some(failure) => format!(
            "no marketplace returned listings after {} attempt(s) (last: {}: {}); {}",
            attempts, failure.target, failure.error, DIRECT_SOURCE_GUIDANCE
        ),
        None => format!(
            "no marketplace targets configured; {}",
            DIRECT_SOURCE_GUIDANCE
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_message_names_last_failure() {
        let err = ScrapeError::Exhausted {
            attempts: 3,
            last_error: Some(TargetFailure {
                target: "ENS.Vision".to_string(),
                error: TargetError::Empty,
            }),
        };
        let message = err.to_string();
        assert!(message.contains("3 attempt(s)"));
        assert!(message.contains("ENS.Vision: no listings found"));
        assert!(message.contains("direct data source"));
    }
}
