use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{
        api::ErrorDto,
        checkin::{CheckinDto, CheckinResultDto, CreateCheckinDto},
    },
    server::{
        controller::util::admin::require_admin,
        error::Error,
        model::app::AppState,
        service::{checkin::CheckinService, member::MemberRef},
    },
};

pub static CHECKIN_TAG: &str = "checkin";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CheckinQuery {
    pub event_id: Option<i32>,
    pub member_id: Option<i32>,
}

/// Checks a member in to an event
///
/// The member is identified by exactly one of `member_id` or `line_user_id`. A registration
/// is not required, but walk-ins are refused once the event is at capacity.
///
/// # Responses
/// - 201 (Created): Check-in stored
/// - 400 (Bad Request): Missing member reference or event not open for check-in
/// - 403 (Forbidden): Member is not active
/// - 404 (Not Found): Member or event not found
/// - 409 (Conflict): Member already checked in, or walk-in at capacity
#[utoipa::path(
    post,
    path = "/api/checkins",
    tag = CHECKIN_TAG,
    request_body = CreateCheckinDto,
    responses(
        (status = 201, description = "Check-in stored", body = CheckinResultDto),
        (status = 400, description = "Invalid request or event not open", body = ErrorDto),
        (status = 403, description = "Member is not active", body = ErrorDto),
        (status = 404, description = "Member or event not found", body = ErrorDto),
        (status = 409, description = "Already checked in or event at capacity", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_checkin(
    State(state): State<AppState>,
    Json(request): Json<CreateCheckinDto>,
) -> Result<impl IntoResponse, Error> {
    let member_ref = MemberRef::from_parts(request.member_id, request.line_user_id)?;

    let checkin = CheckinService::new(&state.db)
        .check_in(member_ref, request.event_id, request.device_info)
        .await?;

    Ok((StatusCode::CREATED, Json(checkin)))
}

#[utoipa::path(
    get,
    path = "/api/checkins",
    tag = CHECKIN_TAG,
    params(CheckinQuery),
    responses(
        (status = 200, description = "Check-ins", body = Vec<CheckinDto>),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_checkins(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CheckinQuery>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let checkins = CheckinService::new(&state.db)
        .list(query.event_id, query.member_id)
        .await?;

    Ok((StatusCode::OK, Json(checkins)))
}

/// Undoes a check-in
#[utoipa::path(
    delete,
    path = "/api/checkins/{id}",
    tag = CHECKIN_TAG,
    params(("id" = i32, Path, description = "Check-in ID")),
    responses(
        (status = 204, description = "Check-in deleted"),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Check-in not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_checkin(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    CheckinService::new(&state.db).undo(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
