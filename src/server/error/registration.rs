use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::json_error;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Member ID {member_id} is already registered for event ID {event_id}")]
    AlreadyRegistered { member_id: i32, event_id: i32 },
    #[error("Event ID {0} is not open for registration")]
    EventNotOpen(i32),
    #[error("Event ID {0} has no confirmed places left")]
    EventFull(i32),
    #[error("Registration ID {0} not found")]
    NotFound(i32),
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::AlreadyRegistered { .. } => json_error(
                StatusCode::CONFLICT,
                "Member is already registered for this event",
            ),
            Self::EventNotOpen(_) => {
                json_error(StatusCode::BAD_REQUEST, "Event is not open for registration")
            }
            Self::EventFull(_) => json_error(StatusCode::CONFLICT, "Event is at capacity"),
            Self::NotFound(_) => json_error(StatusCode::NOT_FOUND, "Registration not found"),
        }
    }
}
