use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::json_error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Admin session is required for this request")]
    NotAuthenticated,
    #[error("Admin login attempted with an invalid password")]
    InvalidCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated => {
                tracing::debug!("{}", self);

                json_error(StatusCode::UNAUTHORIZED, "Admin login required")
            }
            Self::InvalidCredentials => {
                tracing::warn!("{}", self);

                json_error(StatusCode::UNAUTHORIZED, "Invalid password")
            }
        }
    }
}
