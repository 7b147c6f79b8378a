//! Error types for the Lions Club server application.
//!
//! Domain errors (authentication, configuration, members, events, check-ins,
//! registrations, files, LINE) are aggregated into [`Error`]. Every error implements
//! `IntoResponse` so controllers can return them directly; anything without a
//! dedicated mapping becomes a logged 500 response.

pub mod auth;
pub mod checkin;
pub mod config;
pub mod event;
pub mod file;
pub mod line;
pub mod member;
pub mod registration;
pub mod retry;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        auth::AuthError, checkin::CheckinError, config::ConfigError, event::EventError,
        file::FileError, line::LineError, member::MemberError, registration::RegistrationError,
    },
};

/// Main error type for the server application.
///
/// Uses `thiserror`'s `#[from]` so the `?` operator converts domain and library
/// errors automatically.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Admin authentication error.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Member lookup or state error.
    #[error(transparent)]
    MemberError(#[from] MemberError),
    /// Event lookup or validation error.
    #[error(transparent)]
    EventError(#[from] EventError),
    /// Check-in rule violation.
    #[error(transparent)]
    CheckinError(#[from] CheckinError),
    /// Registration rule violation.
    #[error(transparent)]
    RegistrationError(#[from] RegistrationError),
    /// Upload error.
    #[error(transparent)]
    FileError(#[from] FileError),
    /// LINE webhook or Messaging API error.
    #[error(transparent)]
    LineError(#[from] LineError),
    /// A requested record does not exist.
    #[error("{0} not found")]
    NotFound(String),
    /// The request was understood but its content is invalid.
    #[error("Invalid request: {0}")]
    Validation(String),
    /// The request conflicts with existing data.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Failed to parse a value from string or other format.
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug in the server code.
    #[error("Internal error: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// Filesystem error while storing or reading uploads.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Malformed multipart request body.
    #[error(transparent)]
    MultipartError(#[from] axum::extract::multipart::MultipartError),
}

/// Builds a JSON error response with the given status and message.
pub(crate) fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Converts application errors into HTTP responses.
///
/// Domain errors carry their own status codes, `NotFound`, `Validation` and `Conflict`
/// map to 404, 400 and 409, everything else is a logged 500.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::MemberError(err) => err.into_response(),
            Self::EventError(err) => err.into_response(),
            Self::CheckinError(err) => err.into_response(),
            Self::RegistrationError(err) => err.into_response(),
            Self::FileError(err) => err.into_response(),
            Self::LineError(err) => err.into_response(),
            Self::NotFound(resource) => {
                tracing::debug!("{} not found", resource);

                json_error(StatusCode::NOT_FOUND, &format!("{} not found", resource))
            }
            Self::Validation(reason) => {
                tracing::debug!("Rejected invalid request: {}", reason);

                json_error(StatusCode::BAD_REQUEST, &reason)
            }
            Self::Conflict(reason) => {
                tracing::debug!("Rejected conflicting request: {}", reason);

                json_error(StatusCode::CONFLICT, &reason)
            }
            Self::MultipartError(err) => {
                tracing::debug!("Rejected multipart request: {}", err);

                json_error(err.status(), &err.body_text())
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic message to the client so that
/// implementation details are not leaked.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}
