use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::RegistrationStatus;
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{
        api::ErrorDto,
        registration::{CreateRegistrationDto, RegistrationDto, UpdateRegistrationDto},
    },
    server::{
        controller::util::admin::require_admin,
        data::registration::RegistrationFilter,
        error::Error,
        model::app::AppState,
        service::{member::MemberRef, registration::RegistrationService},
    },
};

pub static REGISTRATION_TAG: &str = "registration";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RegistrationQuery {
    pub member_id: Option<i32>,
    pub event_id: Option<i32>,
    #[param(value_type = Option<String>)]
    pub status: Option<RegistrationStatus>,
}

#[utoipa::path(
    get,
    path = "/api/registrations",
    tag = REGISTRATION_TAG,
    params(RegistrationQuery),
    responses(
        (status = 200, description = "Registrations ordered by creation", body = Vec<RegistrationDto>),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<RegistrationQuery>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let registrations = RegistrationService::new(&state.db)
        .list(RegistrationFilter {
            member_id: query.member_id,
            event_id: query.event_id,
            status: query.status,
        })
        .await?;

    Ok((StatusCode::OK, Json(registrations)))
}

/// Registers a member for an event
///
/// The registration is confirmed while the event has places left and waitlisted otherwise.
///
/// # Responses
/// - 201 (Created): Registration confirmed or waitlisted
/// - 400 (Bad Request): Missing member reference or event not open
/// - 403 (Forbidden): Member is not active
/// - 404 (Not Found): Member or event not found
/// - 409 (Conflict): Member is already registered
#[utoipa::path(
    post,
    path = "/api/registrations",
    tag = REGISTRATION_TAG,
    request_body = CreateRegistrationDto,
    responses(
        (status = 201, description = "Registration created", body = RegistrationDto),
        (status = 400, description = "Invalid request or event not open", body = ErrorDto),
        (status = 403, description = "Member is not active", body = ErrorDto),
        (status = 404, description = "Member or event not found", body = ErrorDto),
        (status = 409, description = "Member is already registered", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_registration(
    State(state): State<AppState>,
    Json(request): Json<CreateRegistrationDto>,
) -> Result<impl IntoResponse, Error> {
    let member_ref = MemberRef::from_parts(request.member_id, request.line_user_id)?;

    let registration = RegistrationService::new(&state.db)
        .register(member_ref, request.event_id, request.notes)
        .await?;

    Ok((StatusCode::CREATED, Json(registration)))
}

/// Sets the status of a registration
#[utoipa::path(
    put,
    path = "/api/registrations/{id}",
    tag = REGISTRATION_TAG,
    params(("id" = i32, Path, description = "Registration ID")),
    request_body = UpdateRegistrationDto,
    responses(
        (status = 200, description = "Updated registration", body = RegistrationDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Registration not found", body = ErrorDto),
        (status = 409, description = "Event is at capacity", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_registration(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(update): Json<UpdateRegistrationDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let registration = RegistrationService::new(&state.db)
        .update_status(id, update.status, update.notes)
        .await?;

    Ok((StatusCode::OK, Json(registration)))
}

/// Cancels a registration, promoting the next waitlisted member when a place frees up
#[utoipa::path(
    delete,
    path = "/api/registrations/{id}",
    tag = REGISTRATION_TAG,
    params(("id" = i32, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Cancelled registration", body = RegistrationDto),
        (status = 404, description = "Registration not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_registration(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let registration = RegistrationService::new(&state.db).cancel(id).await?;

    Ok((StatusCode::OK, Json(registration)))
}
