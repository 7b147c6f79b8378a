use std::{future::Future, time::Duration};

use crate::server::error::{retry::ErrorRetryStrategy, Error};

/// Executes operations with exponential backoff on transient failures.
///
/// Errors are classified with [`Error::to_retry_strategy`]: retryable errors are
/// attempted again after `initial_backoff * 2^(attempt - 1)`, anything else is
/// returned immediately.
pub struct RetryContext {
    /// Max attempts before failure
    max_attempts: u32,
    /// Initial backoff between attempts
    initial_backoff: Duration,
}

impl RetryContext {
    const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_backoff: Self::DEFAULT_INITIAL_BACKOFF,
        }
    }

    /// Override the initial backoff
    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// Execute an operation with automatic retry logic
    ///
    /// # Arguments
    /// - `description`: Description of the operation for logging (e.g., "multicast to 120 recipients")
    /// - `operation`: Produces a fresh future for every attempt
    pub async fn execute_with_retry<R, F, Fut>(
        &self,
        description: &str,
        operation: F,
    ) -> Result<R, Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let mut attempt_count = 0;

        loop {
            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count + 1,
                self.max_attempts
            );

            match operation().await {
                Ok(result) => {
                    tracing::debug!("Successfully processed {}", description);
                    return Ok(result);
                }
                Err(e) => match e.to_retry_strategy() {
                    ErrorRetryStrategy::Fail => {
                        tracing::error!("Permanent error for {}: {:?}", description, e);
                        return Err(e);
                    }
                    ErrorRetryStrategy::Retry => {
                        attempt_count += 1;
                        if attempt_count >= self.max_attempts {
                            tracing::error!(
                                "Max attempts ({}) exceeded for {}: {:?}",
                                self.max_attempts,
                                description,
                                e
                            );
                            return Err(e);
                        }

                        let backoff = self.initial_backoff * 2_u32.pow(attempt_count - 1);

                        tracing::warn!(
                            "Retrying {} (attempt {}/{}) after {:?}: {:?}",
                            description,
                            attempt_count,
                            self.max_attempts,
                            backoff,
                            e
                        );

                        tokio::time::sleep(backoff).await;
                    }
                },
            }
        }
    }
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicU32, Ordering},
        time::Duration,
    };

    use crate::server::{
        error::{line::LineError, Error},
        service::retry::RetryContext,
    };

    fn unavailable() -> Error {
        Error::LineError(LineError::Api {
            status: 503,
            body: String::new(),
        })
    }

    /// Expect a transient failure to be retried until success
    #[tokio::test]
    async fn retries_transient_errors() {
        let counter = AtomicU32::new(0);
        let attempts = &counter;
        let ctx = RetryContext::new().with_initial_backoff(Duration::from_millis(1));

        let result = ctx
            .execute_with_retry("flaky operation", || async move {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(unavailable())
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    /// Expect no retry for a permanent error
    #[tokio::test]
    async fn fails_immediately_on_permanent_error() {
        let counter = AtomicU32::new(0);
        let attempts = &counter;
        let ctx = RetryContext::new().with_initial_backoff(Duration::from_millis(1));

        let result: Result<(), Error> = ctx
            .execute_with_retry("rejected operation", || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(Error::LineError(LineError::Api {
                    status: 400,
                    body: String::new(),
                }))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    /// Expect the error after max attempts are exhausted
    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let attempts = &counter;
        let ctx = RetryContext::new().with_initial_backoff(Duration::from_millis(1));

        let result: Result<(), Error> = ctx
            .execute_with_retry("unavailable operation", || async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(unavailable())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}
