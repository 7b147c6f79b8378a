use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::EventStatus;
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{
        api::ErrorDto,
        checkin::CheckinDto,
        event::{CreateEventDto, EventDetailDto, EventDto, UpdateEventDto},
        registration::RegistrationDto,
    },
    server::{
        controller::util::admin::require_admin, error::Error, model::app::AppState,
        service::event::EventService,
    },
};

pub static EVENT_TAG: &str = "event";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EventQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<EventStatus>,
    /// Only open events which have not started yet
    #[serde(default)]
    pub upcoming: bool,
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = EVENT_TAG,
    params(EventQuery),
    responses(
        (status = 200, description = "Events ordered by start", body = Vec<EventDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<impl IntoResponse, Error> {
    let events = EventService::new(&state.db)
        .list(query.status, query.upcoming)
        .await?;

    Ok((StatusCode::OK, Json(events)))
}

#[utoipa::path(
    post,
    path = "/api/events",
    tag = EVENT_TAG,
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = EventDto),
        (status = 400, description = "Invalid schedule or capacity", body = ErrorDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_event(
    State(state): State<AppState>,
    session: Session,
    Json(event): Json<CreateEventDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let event = EventService::new(&state.db).create(event).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// Gets an event with registration and check-in counters
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = EVENT_TAG,
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event detail", body = EventDetailDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let event = EventService::new(&state.db).get_detail(id).await?;

    Ok((StatusCode::OK, Json(event)))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = EVENT_TAG,
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Updated event", body = EventDto),
        (status = 400, description = "Invalid schedule or capacity", body = ErrorDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_event(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateEventDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let event = EventService::new(&state.db).update(id, changes).await?;

    Ok((StatusCode::OK, Json(event)))
}

/// Cancels an event, the record is kept
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = EVENT_TAG,
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Cancelled event", body = EventDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_event(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let event = EventService::new(&state.db).cancel(id).await?;

    Ok((StatusCode::OK, Json(event)))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/registrations",
    tag = EVENT_TAG,
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registrations of the event", body = Vec<RegistrationDto>),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_event_registrations(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let registrations = EventService::new(&state.db).registrations(id).await?;

    Ok((StatusCode::OK, Json(registrations)))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/checkins",
    tag = EVENT_TAG,
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Check-ins of the event", body = Vec<CheckinDto>),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Event not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_event_checkins(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let checkins = EventService::new(&state.db).checkins(id).await?;

    Ok((StatusCode::OK, Json(checkins)))
}
