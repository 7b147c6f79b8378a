use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::json_error;

#[derive(Error, Debug)]
pub enum MemberError {
    /// Member could not be resolved, holds a description of the lookup key
    #[error("Member not found for {0}")]
    NotFound(String),
    #[error("Member ID {0} is not active")]
    NotActive(i32),
    #[error("LINE user ID {0} is already linked to another member")]
    LineUserIdTaken(String),
}

impl IntoResponse for MemberError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::NotFound(_) => json_error(StatusCode::NOT_FOUND, "Member not found"),
            Self::NotActive(_) => json_error(StatusCode::FORBIDDEN, "Member is not active"),
            Self::LineUserIdTaken(_) => json_error(
                StatusCode::CONFLICT,
                "LINE account is already linked to another member",
            ),
        }
    }
}
