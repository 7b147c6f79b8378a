pub mod announcement {
    /// Cron expression for publishing scheduled announcements
    /// Runs every minute at second 0
    pub const CRON_EXPRESSION: &str = "0 * * * * *";
}
