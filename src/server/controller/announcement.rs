use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        announcement::{
            AnnouncementDto, CreateAnnouncementDto, PublishResultDto, UpdateAnnouncementDto,
        },
        api::ErrorDto,
    },
    server::{
        controller::util::admin::require_admin,
        error::Error,
        model::{app::AppState, session::admin::SessionAdmin},
        service::announcement::AnnouncementService,
    },
};

pub static ANNOUNCEMENT_TAG: &str = "announcement";

/// Lists announcements, drafts and scheduled ones are only shown to admins
#[utoipa::path(
    get,
    path = "/api/announcements",
    tag = ANNOUNCEMENT_TAG,
    responses(
        (status = 200, description = "Announcements", body = Vec<AnnouncementDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_announcements(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let is_admin = SessionAdmin::is_admin(&session).await?;

    let announcements = AnnouncementService::new(&state.db, &state.line)
        .list(is_admin)
        .await?;

    Ok((StatusCode::OK, Json(announcements)))
}

#[utoipa::path(
    get,
    path = "/api/announcements/{id}",
    tag = ANNOUNCEMENT_TAG,
    params(("id" = i32, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement", body = AnnouncementDto),
        (status = 404, description = "Announcement not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_announcement(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let is_admin = SessionAdmin::is_admin(&session).await?;

    let announcement = AnnouncementService::new(&state.db, &state.line)
        .get(id, is_admin)
        .await?;

    Ok((StatusCode::OK, Json(announcement)))
}

#[utoipa::path(
    post,
    path = "/api/announcements",
    tag = ANNOUNCEMENT_TAG,
    request_body = CreateAnnouncementDto,
    responses(
        (status = 201, description = "Announcement created", body = AnnouncementDto),
        (status = 400, description = "Invalid announcement", body = ErrorDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_announcement(
    State(state): State<AppState>,
    session: Session,
    Json(announcement): Json<CreateAnnouncementDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let announcement = AnnouncementService::new(&state.db, &state.line)
        .create(announcement)
        .await?;

    Ok((StatusCode::CREATED, Json(announcement)))
}

#[utoipa::path(
    put,
    path = "/api/announcements/{id}",
    tag = ANNOUNCEMENT_TAG,
    params(("id" = i32, Path, description = "Announcement ID")),
    request_body = UpdateAnnouncementDto,
    responses(
        (status = 200, description = "Updated announcement", body = AnnouncementDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Announcement not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_announcement(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateAnnouncementDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let announcement = AnnouncementService::new(&state.db, &state.line)
        .update(id, changes)
        .await?;

    Ok((StatusCode::OK, Json(announcement)))
}

#[utoipa::path(
    delete,
    path = "/api/announcements/{id}",
    tag = ANNOUNCEMENT_TAG,
    params(("id" = i32, Path, description = "Announcement ID")),
    responses(
        (status = 204, description = "Announcement deleted"),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Announcement not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_announcement(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    AnnouncementService::new(&state.db, &state.line)
        .delete(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Publishes an announcement now, pushing it to LINE when `push_to_line` is set
///
/// # Responses
/// - 200 (OK): Published, with the push record ID when a push was sent
/// - 401 (Unauthorized): Admin login required
/// - 404 (Not Found): Announcement not found
/// - 409 (Conflict): Announcement was already published
#[utoipa::path(
    post,
    path = "/api/announcements/{id}/publish",
    tag = ANNOUNCEMENT_TAG,
    params(("id" = i32, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement published", body = PublishResultDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Announcement not found", body = ErrorDto),
        (status = 409, description = "Announcement already published", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn publish_announcement(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let result = AnnouncementService::new(&state.db, &state.line)
        .publish(id)
        .await?;

    Ok((StatusCode::OK, Json(result)))
}
