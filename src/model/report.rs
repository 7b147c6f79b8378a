use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::event::EventDto;

/// Club-wide counters for the admin dashboard
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatsDto {
    pub active_members: u64,
    pub line_linked_members: u64,
    pub upcoming_events: u64,
    pub total_registrations: u64,
    pub total_checkins: u64,
    pub checkins_today: u64,
    pub pushes_sent: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegistrationCountsDto {
    pub confirmed: u64,
    pub pending: u64,
    pub cancelled: u64,
    pub waitlist: u64,
}

/// Attendance report of a single event
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EventReportDto {
    pub event: EventDto,
    pub registrations: RegistrationCountsDto,
    pub checkins: u64,
    /// Check-ins by members without a confirmed registration
    pub walk_ins: u64,
    /// Confirmed registrations without a check-in
    pub no_shows: u64,
    /// Share of confirmed registrants who checked in, 0.0 to 1.0
    pub attendance_rate: f64,
}
