use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::{json_error, InternalServerError};

#[derive(Error, Debug)]
pub enum LineError {
    #[error("Webhook request is missing the x-line-signature header")]
    MissingSignature,
    #[error("Webhook request signature does not match the channel secret")]
    InvalidSignature,
    #[error("Failed to parse webhook payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// LINE Messaging API answered with a non-success status
    #[error("LINE API responded with status {status}: {body}")]
    Api { status: u16, body: String },
    /// Network or decoding failure talking to the LINE Messaging API
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Crypto(#[from] openssl::error::ErrorStack),
}

impl IntoResponse for LineError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingSignature => {
                tracing::warn!("{}", self);

                json_error(StatusCode::BAD_REQUEST, "Missing LINE signature")
            }
            Self::InvalidSignature => {
                tracing::warn!("{}", self);

                json_error(StatusCode::UNAUTHORIZED, "Invalid LINE signature")
            }
            Self::InvalidPayload(_) => {
                tracing::warn!("{}", self);

                json_error(StatusCode::BAD_REQUEST, "Invalid webhook payload")
            }
            Self::Api { .. } | Self::Request(_) => {
                tracing::error!("{}", self);

                json_error(StatusCode::BAD_GATEWAY, "LINE API request failed")
            }
            Self::Crypto(_) => InternalServerError(self).into_response(),
        }
    }
}
