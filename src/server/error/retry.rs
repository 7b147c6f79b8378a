use sea_orm::DbErr;

use super::{line::LineError, Error};

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (transient failures)
    Retry,
    /// Failed permanently (bad request, rule violation, bug)
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::LineError(line_error) => match line_error {
                // 5xx means LINE is temporarily unavailable, 429 means we are being rate limited
                LineError::Api { status, .. } if *status >= 500 || *status == 429 => {
                    ErrorRetryStrategy::Retry
                }
                // Any other status is a request LINE will never accept
                LineError::Api { .. } => ErrorRetryStrategy::Fail,
                LineError::Request(reqwest_error) => match reqwest_error.status() {
                    Some(status) if status.is_server_error() => ErrorRetryStrategy::Retry,
                    Some(_) => ErrorRetryStrategy::Fail,
                    // Network error or connection issue
                    None => ErrorRetryStrategy::Retry,
                },
                _ => ErrorRetryStrategy::Fail,
            },

            Self::DbErr(db_err) => match db_err {
                // Connection acquisition and connection errors are transient
                DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                DbErr::Conn(_) => ErrorRetryStrategy::Retry,

                // Query errors, constraint violations, type conversion and missing records
                // won't resolve with a retry
                _ => ErrorRetryStrategy::Fail,
            },

            // Could be a transient filesystem condition
            Self::IoError(_) => ErrorRetryStrategy::Retry,

            Self::ConfigError(_)
            | Self::AuthError(_)
            | Self::MemberError(_)
            | Self::EventError(_)
            | Self::CheckinError(_)
            | Self::RegistrationError(_)
            | Self::FileError(_)
            | Self::NotFound(_)
            | Self::Validation(_)
            | Self::Conflict(_)
            | Self::ParseError(_)
            | Self::InternalError(_)
            | Self::SessionError(_)
            | Self::SchedulerError(_)
            | Self::MultipartError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
