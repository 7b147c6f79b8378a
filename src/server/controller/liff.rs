use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    model::{
        api::ErrorDto,
        liff::{LiffConfigDto, LiffProfileDto, LiffRegisterDto},
        member::MemberDto,
    },
    server::{error::Error, model::app::AppState, service::liff::LiffService},
};

pub static LIFF_TAG: &str = "liff";

/// LIFF app ID the mini app initialises with
#[utoipa::path(
    get,
    path = "/api/liff/config",
    tag = LIFF_TAG,
    responses((status = 200, description = "LIFF configuration", body = LiffConfigDto)),
)]
pub async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(LiffConfigDto {
        liff_id: state.config.liff_id.clone(),
    })
}

/// Registers the LINE user as a member, or updates the linked member's contact details
#[utoipa::path(
    post,
    path = "/api/liff/register",
    tag = LIFF_TAG,
    request_body = LiffRegisterDto,
    responses(
        (status = 201, description = "Member created", body = MemberDto),
        (status = 200, description = "Linked member updated", body = MemberDto),
        (status = 400, description = "Invalid registration", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<LiffRegisterDto>,
) -> Result<impl IntoResponse, Error> {
    let (member, created) = LiffService::new(&state.db).register(request).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(member)))
}

#[utoipa::path(
    get,
    path = "/api/liff/me/{line_user_id}",
    tag = LIFF_TAG,
    params(("line_user_id" = String, Path, description = "LINE user ID")),
    responses(
        (status = 200, description = "Member profile with activity", body = LiffProfileDto),
        (status = 404, description = "Member not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(line_user_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let profile = LiffService::new(&state.db).profile(&line_user_id).await?;

    Ok((StatusCode::OK, Json(profile)))
}
