use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::json_error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Event ID {0} not found")]
    NotFound(i32),
    #[error("Event end time must not be before its start time")]
    EndsBeforeStart,
    #[error("Event capacity must not be negative, got {0}")]
    NegativeCapacity(i32),
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::NotFound(_) => json_error(StatusCode::NOT_FOUND, "Event not found"),
            err => json_error(StatusCode::BAD_REQUEST, &err.to_string()),
        }
    }
}
