use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        auth::{LoginDto, SessionDto},
    },
    server::{
        error::Error,
        model::{app::AppState, session::admin::SessionAdmin},
        service::auth::AuthService,
    },
};

pub static AUTH_TAG: &str = "auth";

/// Logs in as admin with the configured password
///
/// # Responses
/// - 200 (OK): Session is now authenticated
/// - 401 (Unauthorized): Wrong password
/// - 500 (Internal Server Error): Session store failure
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = SessionDto),
        (status = 401, description = "Invalid password", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(login): Json<LoginDto>,
) -> Result<impl IntoResponse, Error> {
    AuthService::new(&state.config.admin_password)
        .login(&session, &login.password)
        .await?;

    Ok((StatusCode::OK, Json(SessionDto { authenticated: true })))
}

/// Logs the admin out by clearing their session
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged out", body = SessionDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    AuthService::new(&state.config.admin_password)
        .logout(&session)
        .await?;

    Ok((StatusCode::OK, Json(SessionDto { authenticated: false })))
}

/// Whether the current session is an admin session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Session state", body = SessionDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_session(session: Session) -> Result<impl IntoResponse, Error> {
    let authenticated = SessionAdmin::is_admin(&session).await?;

    Ok((StatusCode::OK, Json(SessionDto { authenticated })))
}
