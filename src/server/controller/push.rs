use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::MessageDirection;
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{
        api::ErrorDto,
        push::{
            CreatePushTemplateDto, MessageLogDto, PushRecordDto, PushTemplateDto, SendPushDto,
            UpdatePushTemplateDto,
        },
    },
    server::{
        controller::util::admin::require_admin, error::Error, model::app::AppState,
        service::push::PushService,
    },
};

pub static PUSH_TAG: &str = "push";

const DEFAULT_MESSAGE_LIMIT: u64 = 100;
const MAX_MESSAGE_LIMIT: u64 = 1000;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MessageQuery {
    pub line_user_id: Option<String>,
    #[param(value_type = Option<String>)]
    pub direction: Option<MessageDirection>,
    pub limit: Option<u64>,
}

/// Sends a push message to LINE users
///
/// Recipients sharing the same rendered text are sent in multicast batches. Every request
/// stores a push record with its delivery counts.
///
/// # Responses
/// - 200 (OK): Push record, including partial or failed deliveries
/// - 400 (Bad Request): No content or no recipients matched the target
/// - 401 (Unauthorized): Admin login required
/// - 404 (Not Found): Template or event not found
#[utoipa::path(
    post,
    path = "/api/push/send",
    tag = PUSH_TAG,
    request_body = SendPushDto,
    responses(
        (status = 200, description = "Push record", body = PushRecordDto),
        (status = 400, description = "No content or no recipients", body = ErrorDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Template or event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn send_push(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SendPushDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let record = PushService::new(&state.db, &state.line)
        .send(request)
        .await?;

    Ok((StatusCode::OK, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/push/records",
    tag = PUSH_TAG,
    responses(
        (status = 200, description = "Latest push records", body = Vec<PushRecordDto>),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_push_records(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let records = PushService::new(&state.db, &state.line)
        .list_records()
        .await?;

    Ok((StatusCode::OK, Json(records)))
}

#[utoipa::path(
    get,
    path = "/api/push/records/{id}",
    tag = PUSH_TAG,
    params(("id" = i32, Path, description = "Push record ID")),
    responses(
        (status = 200, description = "Push record", body = PushRecordDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Push record not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_push_record(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let record = PushService::new(&state.db, &state.line)
        .get_record(id)
        .await?;

    Ok((StatusCode::OK, Json(record)))
}

/// Inbound and outbound LINE messages, newest first
#[utoipa::path(
    get,
    path = "/api/push/messages",
    tag = PUSH_TAG,
    params(MessageQuery),
    responses(
        (status = 200, description = "Message log", body = Vec<MessageLogDto>),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_messages(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_MESSAGE_LIMIT)
        .clamp(1, MAX_MESSAGE_LIMIT);
    let messages = PushService::new(&state.db, &state.line)
        .list_messages(query.line_user_id.as_deref(), query.direction, limit)
        .await?;

    Ok((StatusCode::OK, Json(messages)))
}

#[utoipa::path(
    get,
    path = "/api/push/templates",
    tag = PUSH_TAG,
    responses(
        (status = 200, description = "Push templates", body = Vec<PushTemplateDto>),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_templates(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let templates = PushService::new(&state.db, &state.line)
        .list_templates()
        .await?;

    Ok((StatusCode::OK, Json(templates)))
}

#[utoipa::path(
    post,
    path = "/api/push/templates",
    tag = PUSH_TAG,
    request_body = CreatePushTemplateDto,
    responses(
        (status = 201, description = "Template created", body = PushTemplateDto),
        (status = 400, description = "Invalid template", body = ErrorDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 409, description = "Template name taken", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_template(
    State(state): State<AppState>,
    session: Session,
    Json(template): Json<CreatePushTemplateDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let template = PushService::new(&state.db, &state.line)
        .create_template(template)
        .await?;

    Ok((StatusCode::CREATED, Json(template)))
}

#[utoipa::path(
    get,
    path = "/api/push/templates/{id}",
    tag = PUSH_TAG,
    params(("id" = i32, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Push template", body = PushTemplateDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Template not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_template(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let template = PushService::new(&state.db, &state.line)
        .get_template(id)
        .await?;

    Ok((StatusCode::OK, Json(template)))
}

#[utoipa::path(
    put,
    path = "/api/push/templates/{id}",
    tag = PUSH_TAG,
    params(("id" = i32, Path, description = "Template ID")),
    request_body = UpdatePushTemplateDto,
    responses(
        (status = 200, description = "Updated template", body = PushTemplateDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Template not found", body = ErrorDto),
        (status = 409, description = "Template name taken", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_template(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(changes): Json<UpdatePushTemplateDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let template = PushService::new(&state.db, &state.line)
        .update_template(id, changes)
        .await?;

    Ok((StatusCode::OK, Json(template)))
}

#[utoipa::path(
    delete,
    path = "/api/push/templates/{id}",
    tag = PUSH_TAG,
    params(("id" = i32, Path, description = "Template ID")),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Template not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_template(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    PushService::new(&state.db, &state.line)
        .delete_template(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
