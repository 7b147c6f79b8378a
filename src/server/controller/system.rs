use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::system::{HealthDto, SystemStatusDto},
    server::{model::app::AppState, service::system::SystemService},
};

pub static SYSTEM_TAG: &str = "system";

/// Liveness check, does not touch the database
#[utoipa::path(
    get,
    path = "/health",
    tag = SYSTEM_TAG,
    responses((status = 200, description = "Server is running", body = HealthDto)),
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthDto {
        status: "ok".to_string(),
        database: None,
    })
}

/// Readiness check pinging the database
#[utoipa::path(
    get,
    path = "/healthz",
    tag = SYSTEM_TAG,
    responses(
        (status = 200, description = "Database reachable", body = HealthDto),
        (status = 503, description = "Database unavailable", body = HealthDto)
    ),
)]
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    if SystemService::new(&state).database_ok().await {
        (
            StatusCode::OK,
            Json(HealthDto {
                status: "ok".to_string(),
                database: Some("ok".to_string()),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthDto {
                status: "error".to_string(),
                database: Some("unavailable".to_string()),
            }),
        )
    }
}

/// Version, uptime, dependency checks and record counts
#[utoipa::path(
    get,
    path = "/api/system/status",
    tag = SYSTEM_TAG,
    responses((status = 200, description = "System status", body = SystemStatusDto)),
)]
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(SystemService::new(&state).status().await)
}
