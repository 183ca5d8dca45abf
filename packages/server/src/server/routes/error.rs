use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::domains::marketplace::error::ScrapeError;
use crate::domains::valuation::ValuationError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Unexpected failures are logged here and reported without detail.
pub fn internal_error(err: impl std::fmt::Display) -> ApiError {
    tracing::error!(error = %err, "Request failed");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

pub fn scrape_error(err: ScrapeError) -> ApiError {
    let status = match err {
        ScrapeError::Connectivity { .. } => StatusCode::SERVICE_UNAVAILABLE,
        ScrapeError::Exhausted { .. } => StatusCode::BAD_GATEWAY,
    };
    api_error(status, err.to_string())
}

pub fn valuation_error(err: ValuationError) -> ApiError {
    match err {
        ValuationError::InvalidName { .. } => api_error(StatusCode::BAD_REQUEST, err.to_string()),
        ValuationError::Comparables(_) => internal_error(err),
    }
}
