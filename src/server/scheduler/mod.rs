//! Scheduler for periodic background tasks.
//!
//! This module provides a cron-based job scheduler. Its only job publishes scheduled
//! announcements once their publish time has passed, using the same publish path as the
//! admin endpoint so announcements flagged for LINE are pushed as well.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::Error, line::LineClient};

pub mod announcement;
pub mod config;

use self::{
    announcement::publish_due_announcements, config::announcement as announcement_config,
};

/// Job scheduler for background tasks.
pub struct Scheduler {
    db: DatabaseConnection,
    line: LineClient,
    sched: JobScheduler,
}

impl Scheduler {
    /// Creates a new instance of [`Scheduler`].
    ///
    /// # Arguments
    /// - `db` - Database connection handed to every job
    /// - `line` - LINE client for jobs which push messages
    ///
    /// # Returns
    /// - `Ok(Scheduler)` - Successfully created scheduler instance
    /// - `Err(Error)` - Failed to initialize the underlying job scheduler
    pub async fn new(db: DatabaseConnection, line: LineClient) -> Result<Self, Error> {
        let sched = JobScheduler::new().await?;
        Ok(Self { db, line, sched })
    }

    /// Registers all scheduled jobs and starts the scheduler.
    ///
    /// # Returns
    /// - `Ok(())` - All jobs successfully registered and scheduler started
    /// - `Err(Error)` - Failed to register a job or start the scheduler
    pub async fn start(mut self) -> Result<(), Error> {
        self.schedule_job(
            announcement_config::CRON_EXPRESSION,
            "scheduled announcement",
            publish_due_announcements,
        )
        .await?;

        self.sched.start().await?;

        Ok(())
    }

    /// Schedules a recurring job with the specified cron expression.
    ///
    /// The job receives clones of the database connection and LINE client and logs how many
    /// items it processed, or the error it failed with.
    ///
    /// # Arguments
    /// - `cron` - Cron expression with seconds, e.g. "0 * * * * *" for every minute
    /// - `name` - Human-readable name for the job (used in log messages)
    /// - `function` - Async function returning the number of processed items
    ///
    /// # Returns
    /// - `Ok(())` - Job successfully registered with the scheduler
    /// - `Err(Error)` - Invalid cron expression or scheduler error
    pub async fn schedule_job<F, Fut>(
        &mut self,
        cron: &str,
        name: &str,
        function: F,
    ) -> Result<(), Error>
    where
        F: Fn(DatabaseConnection, LineClient) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<usize, Error>> + Send + 'static,
    {
        let db = self.db.clone();
        let line = self.line.clone();
        let name = name.to_string();
        let function = Arc::new(function);

        self.sched
            .add(Job::new_async(cron, move |_, _| {
                let db = db.clone();
                let line = line.clone();
                let name = name.clone();
                let function = Arc::clone(&function);

                Box::pin(async move {
                    match function(db, line).await {
                        Ok(0) => tracing::trace!("No {} job work", name),
                        Ok(count) => tracing::info!("Processed {} {}(s)", count, name),
                        Err(e) => tracing::error!("Error running {} job: {:?}", name, e),
                    }
                })
            })?)
            .await?;

        Ok(())
    }
}
