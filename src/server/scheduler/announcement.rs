use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    error::Error, line::LineClient, service::announcement::AnnouncementService,
};

/// Publishes scheduled announcements whose time has come
///
/// # Returns
/// - `Ok(usize)` - Number of announcements published
/// - `Err(Error)` - Failed to query due announcements
pub async fn publish_due_announcements(
    db: DatabaseConnection,
    line: LineClient,
) -> Result<usize, Error> {
    AnnouncementService::new(&db, &line)
        .publish_due(Utc::now().naive_utc())
        .await
}
