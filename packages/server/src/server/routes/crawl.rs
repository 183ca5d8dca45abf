use axum::{extract::Extension, Json};

use super::error::{scrape_error, ApiError};
use crate::domains::marketplace::collect::{collect_listings, CollectReport};
use crate::server::app::AppState;

/// POST /api/crawl - scrape the marketplaces and store the listings
pub async fn crawl_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<CollectReport>, ApiError> {
    collect_listings(&state.deps)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::warn!(error = %e, "Crawl failed");
            scrape_error(e)
        })
}
