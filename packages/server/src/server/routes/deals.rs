use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::error::{api_error, internal_error, ApiError};
use crate::domains::deals::{analyze_stored_deals, DealCriteria, DealReport};
use crate::server::app::AppState;

/// Upper bound on `limit` for a single request
const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct DealsQuery {
    /// Minimum discount below floor, in percent
    min_discount: Option<f64>,
    max_price: Option<f64>,
    limit: Option<usize>,
}

impl DealsQuery {
    fn into_criteria(self) -> Result<DealCriteria, ApiError> {
        let defaults = DealCriteria::default();
        let min_discount_pct = self.min_discount.unwrap_or(defaults.min_discount_pct);
        if !(0.0..=100.0).contains(&min_discount_pct) {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "min_discount must be between 0 and 100",
            ));
        }
        if self.max_price.is_some_and(|max| max < 0.0) {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "max_price must not be negative",
            ));
        }

        Ok(DealCriteria {
            min_discount_pct,
            max_price: self.max_price,
            limit: self.limit.unwrap_or(defaults.limit).min(MAX_LIMIT),
        })
    }
}

/// GET /api/deals - rank stored listings priced below floor
pub async fn deals_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<DealsQuery>,
) -> Result<Json<DealReport>, ApiError> {
    let criteria = query.into_criteria()?;
    analyze_stored_deals(&state.deps, &criteria)
        .await
        .map(Json)
        .map_err(internal_error)
}
