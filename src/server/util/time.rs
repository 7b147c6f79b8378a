//! Time and date calculation utilities.

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};

/// Start of the UTC day containing `now`.
///
/// Used as the lower bound for "today" counters such as check-ins today.
///
/// # Arguments
/// - `now` - Current UTC timestamp
///
/// # Returns
/// - `NaiveDateTime` - Midnight UTC of the same date
pub fn start_of_day(now: DateTime<Utc>) -> NaiveDateTime {
    now.date_naive().and_time(NaiveTime::MIN)
}

/// Whole seconds elapsed between `since` and `now`, zero if `since` is in the future.
pub fn elapsed_seconds(since: std::time::Instant, now: std::time::Instant) -> u64 {
    now.saturating_duration_since(since).as_secs()
}
