use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::json_error;

/// Startup configuration problems.
///
/// Raised while reading the environment and while building the CORS layer.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required variable is unset or blank
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue { var: String, reason: String },
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        tracing::error!("Configuration error while serving a request: {}", self);

        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Server is misconfigured")
    }
}
