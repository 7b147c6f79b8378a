use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        report::{EventReportDto, StatsDto},
    },
    server::{
        controller::util::admin::require_admin, error::Error, model::app::AppState,
        service::report::ReportService,
    },
};

pub static ADMIN_TAG: &str = "admin";

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

fn csv_response(filename: &str, body: String) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}

/// Club-wide counters for the dashboard
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Dashboard statistics", body = StatsDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_stats(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let stats = ReportService::new(&state.db).stats().await?;

    Ok((StatusCode::OK, Json(stats)))
}

/// Attendance report of an event
#[utoipa::path(
    get,
    path = "/api/admin/events/{id}/report",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event report", body = EventReportDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_event_report(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let report = ReportService::new(&state.db).event_report(id).await?;

    Ok((StatusCode::OK, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/admin/members/export.csv",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Members as CSV", content_type = "text/csv"),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_members(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let csv = ReportService::new(&state.db).members_csv().await?;

    Ok(csv_response("members.csv", csv))
}

#[utoipa::path(
    get,
    path = "/api/admin/events/{id}/checkins/export.csv",
    tag = ADMIN_TAG,
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Check-ins of the event as CSV", content_type = "text/csv"),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_event_checkins(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let csv = ReportService::new(&state.db).event_checkins_csv(id).await?;

    Ok(csv_response(&format!("event-{}-checkins.csv", id), csv))
}
