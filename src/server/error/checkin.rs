use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::json_error;

/// Check-in rule violations.
///
/// Every entry point (REST, LIFF, LINE bot) reports a duplicate check-in as
/// [`CheckinError::AlreadyCheckedIn`], which is always a 409.
#[derive(Error, Debug)]
pub enum CheckinError {
    #[error("Member ID {member_id} has already checked in to event ID {event_id}")]
    AlreadyCheckedIn { member_id: i32, event_id: i32 },
    #[error("Event ID {0} is not open for check-in")]
    EventNotOpen(i32),
    #[error("Event ID {0} is at capacity")]
    EventFull(i32),
    #[error("Check-in ID {0} not found")]
    NotFound(i32),
}

impl IntoResponse for CheckinError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::AlreadyCheckedIn { .. } => json_error(
                StatusCode::CONFLICT,
                "Member has already checked in to this event",
            ),
            Self::EventNotOpen(_) => {
                json_error(StatusCode::BAD_REQUEST, "Event is not open for check-in")
            }
            Self::EventFull(_) => json_error(StatusCode::CONFLICT, "Event is at capacity"),
            Self::NotFound(_) => json_error(StatusCode::NOT_FOUND, "Check-in not found"),
        }
    }
}
