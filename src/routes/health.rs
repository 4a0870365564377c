use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    /// Whether the store server answered `/api/settings`.
    pub backend_reachable: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
        tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let backend_reachable = match state.backend.settings().await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "store server unreachable");
            false
        }
    };
    let data = HealthData {
        status: if backend_reachable { "ok" } else { "degraded" }.to_string(),
        backend_reachable,
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    ))
}
