use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::{MemberRole, MemberStatus};
use serde::Deserialize;
use tower_sessions::Session;
use utoipa::IntoParams;

use crate::{
    model::{
        api::{ErrorDto, PageDto},
        member::{CreateMemberDto, MemberDto, UpdateMemberDto},
    },
    server::{
        controller::util::admin::require_admin, data::member::MemberFilter, error::Error,
        model::app::AppState, service::member::MemberService,
    },
};

pub static MEMBER_TAG: &str = "member";

const DEFAULT_PER_PAGE: u64 = 20;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MemberQuery {
    #[param(value_type = Option<String>)]
    pub status: Option<MemberStatus>,
    #[param(value_type = Option<String>)]
    pub role: Option<MemberRole>,
    /// Substring of name, email or phone
    pub q: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Lists members page by page
#[utoipa::path(
    get,
    path = "/api/members",
    tag = MEMBER_TAG,
    params(MemberQuery),
    responses(
        (status = 200, description = "Page of members", body = PageDto<MemberDto>),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_members(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MemberQuery>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let filter = MemberFilter {
        status: query.status,
        role: query.role,
        q: query.q.filter(|q| !q.trim().is_empty()),
    };
    let page = MemberService::new(&state.db)
        .list(
            filter,
            query.page.unwrap_or(1),
            query.per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
        .await?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    post,
    path = "/api/members",
    tag = MEMBER_TAG,
    request_body = CreateMemberDto,
    responses(
        (status = 201, description = "Member created", body = MemberDto),
        (status = 400, description = "Invalid member", body = ErrorDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 409, description = "LINE account already linked", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_member(
    State(state): State<AppState>,
    session: Session,
    Json(member): Json<CreateMemberDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let member = MemberService::new(&state.db).create(member).await?;

    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    get,
    path = "/api/members/{id}",
    tag = MEMBER_TAG,
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member", body = MemberDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Member not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_member(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let member = MemberService::new(&state.db).get(id).await?;

    Ok((StatusCode::OK, Json(member)))
}

/// Gets the member linked to a LINE account
#[utoipa::path(
    get,
    path = "/api/members/line/{line_user_id}",
    tag = MEMBER_TAG,
    params(("line_user_id" = String, Path, description = "LINE user ID")),
    responses(
        (status = 200, description = "Member", body = MemberDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Member not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_member_by_line_user_id(
    State(state): State<AppState>,
    session: Session,
    Path(line_user_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let member = MemberService::new(&state.db)
        .get_by_line_user_id(&line_user_id)
        .await?;

    Ok((StatusCode::OK, Json(member)))
}

/// Partially updates a member
#[utoipa::path(
    put,
    path = "/api/members/{id}",
    tag = MEMBER_TAG,
    params(("id" = i32, Path, description = "Member ID")),
    request_body = UpdateMemberDto,
    responses(
        (status = 200, description = "Updated member", body = MemberDto),
        (status = 400, description = "Invalid member", body = ErrorDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Member not found", body = ErrorDto),
        (status = 409, description = "LINE account already linked", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_member(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateMemberDto>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let member = MemberService::new(&state.db).update(id, changes).await?;

    Ok((StatusCode::OK, Json(member)))
}

/// Deactivates a member, the record is kept
#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = MEMBER_TAG,
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Deactivated member", body = MemberDto),
        (status = 401, description = "Admin login required", body = ErrorDto),
        (status = 404, description = "Member not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_member(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_admin(&session).await?;

    let member = MemberService::new(&state.db).deactivate(id).await?;

    Ok((StatusCode::OK, Json(member)))
}
