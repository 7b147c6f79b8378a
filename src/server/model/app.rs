use std::{sync::Arc, time::Instant};

use sea_orm::DatabaseConnection;

use crate::server::{config::Config, line::LineClient};

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub line: LineClient,
    pub config: Arc<Config>,
    /// Process start, reported as uptime by the system status endpoint
    pub started_at: Instant,
}
