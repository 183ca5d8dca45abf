use axum::{
    extract::{Extension, Path},
    Json,
};

use super::error::{valuation_error, ApiError};
use crate::domains::valuation::{valuate_domain, Valuation};
use crate::server::app::AppState;

/// GET /api/valuate/:name
pub async fn valuate_handler(
    Extension(state): Extension<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Valuation>, ApiError> {
    valuate_domain(&state.deps, &name)
        .await
        .map(Json)
        .map_err(valuation_error)
}
