use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};

use super::error::{api_error, internal_error, valuation_error, ApiError};
use crate::domains::valuation::parse_ens_name;
use crate::kernel::DomainInfo;
use crate::server::app::AppState;

/// GET /api/domains/:name - registry facts for one ENS name
pub async fn domain_info_handler(
    Extension(state): Extension<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DomainInfo>, ApiError> {
    let (name, _label) = parse_ens_name(&name).map_err(valuation_error)?;

    match state.deps.registry.lookup(&name).await {
        Ok(Some(info)) => Ok(Json(info)),
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("{} is not registered", name),
        )),
        Err(e) => Err(internal_error(e)),
    }
}
