use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    store: StoreHealth,
    targets: usize,
}

#[derive(Serialize)]
pub struct StoreHealth {
    backend: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Returns 200 OK when the listing store answers, 503 Service Unavailable otherwise.
/// Firecrawl is not contacted here.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let store = &state.deps.store;

    let (store_status, error) = match tokio::time::timeout(
        std::time::Duration::from_secs(5),
        store.ping(),
    )
    .await
    {
        Ok(Ok(())) => ("ok", None),
        Ok(Err(e)) => ("error", Some(format!("Query failed: {}", e))),
        Err(_) => ("error", Some("Query timeout (>5s)".to_string())),
    };

    let is_healthy = error.is_none();
    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            store: StoreHealth {
                backend: store.backend().to_string(),
                status: store_status.to_string(),
                error,
            },
            targets: state.deps.targets.len(),
        }),
    )
}
