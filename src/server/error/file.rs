use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::json_error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("Upload of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: u64, max: u64 },
    #[error("Multipart request is missing the `file` field")]
    MissingFile,
    #[error("File ID {0} not found")]
    NotFound(i32),
}

impl IntoResponse for FileError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::TooLarge { .. } => json_error(StatusCode::PAYLOAD_TOO_LARGE, &self.to_string()),
            Self::MissingFile => json_error(StatusCode::BAD_REQUEST, &self.to_string()),
            Self::NotFound(_) => json_error(StatusCode::NOT_FOUND, "File not found"),
        }
    }
}
