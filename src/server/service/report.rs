//! Dashboard statistics, event attendance reports and CSV exports.

use std::collections::HashSet;

use chrono::Utc;
use entity::sea_orm_active_enums::{MemberStatus, RegistrationStatus};
use sea_orm::DatabaseConnection;

use crate::{
    model::report::{EventReportDto, RegistrationCountsDto, StatsDto},
    server::{
        data::{
            checkin::CheckinRepository,
            event::EventRepository,
            member::MemberRepository,
            push_record::PushRecordRepository,
            registration::{RegistrationFilter, RegistrationRepository},
        },
        error::Error,
        service::event::resolve_event,
        util::{csv::CsvWriter, time::start_of_day},
    },
};

const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn enum_label<T: std::fmt::Debug>(value: &T) -> String {
    format!("{:?}", value).to_lowercase()
}

pub struct ReportService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReportService<'a> {
    /// Creates a new instance of [`ReportService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Club-wide counters for the admin dashboard
    pub async fn stats(&self) -> Result<StatsDto, Error> {
        let now = Utc::now();
        let members = MemberRepository::new(self.db);
        let checkins = CheckinRepository::new(self.db);

        Ok(StatsDto {
            active_members: members.count_by_status(MemberStatus::Active).await?,
            line_linked_members: members.count_line_linked().await?,
            upcoming_events: EventRepository::new(self.db)
                .count_upcoming(now.naive_utc())
                .await?,
            total_registrations: RegistrationRepository::new(self.db).count_active().await?,
            total_checkins: checkins.count_all().await?,
            checkins_today: checkins.count_since(start_of_day(now)).await?,
            pushes_sent: PushRecordRepository::new(self.db).count_delivered().await?,
        })
    }

    /// Attendance report of an event
    ///
    /// Walk-ins are check-ins without a confirmed registration, no-shows are confirmed
    /// registrations without a check-in. The attendance rate is the share of confirmed
    /// registrants who checked in, 0.0 when nobody is confirmed.
    pub async fn event_report(&self, event_id: i32) -> Result<EventReportDto, Error> {
        let event = resolve_event(self.db, event_id).await?;

        let registrations = RegistrationRepository::new(self.db)
            .list(&RegistrationFilter {
                event_id: Some(event.id),
                ..Default::default()
            })
            .await?;
        let checkins = CheckinRepository::new(self.db)
            .list(Some(event.id), None)
            .await?;

        let mut counts = RegistrationCountsDto::default();
        for registration in &registrations {
            match registration.status {
                RegistrationStatus::Confirmed => counts.confirmed += 1,
                RegistrationStatus::Pending => counts.pending += 1,
                RegistrationStatus::Cancelled => counts.cancelled += 1,
                RegistrationStatus::Waitlist => counts.waitlist += 1,
            }
        }

        let confirmed: HashSet<i32> = registrations
            .iter()
            .filter(|r| r.status == RegistrationStatus::Confirmed)
            .map(|r| r.member_id)
            .collect();
        let checked_in: HashSet<i32> = checkins.iter().map(|c| c.member_id).collect();

        let walk_ins = checked_in.difference(&confirmed).count() as u64;
        let no_shows = confirmed.difference(&checked_in).count() as u64;
        let attended = confirmed.intersection(&checked_in).count();
        let attendance_rate = if confirmed.is_empty() {
            0.0
        } else {
            attended as f64 / confirmed.len() as f64
        };

        Ok(EventReportDto {
            event: event.into(),
            registrations: counts,
            checkins: checkins.len() as u64,
            walk_ins,
            no_shows,
            attendance_rate,
        })
    }

    /// All members as CSV
    pub async fn members_csv(&self) -> Result<String, Error> {
        let members = MemberRepository::new(self.db).list_all().await?;

        let mut csv = CsvWriter::new();
        csv.write_row([
            "id",
            "name",
            "email",
            "phone",
            "line_user_id",
            "role",
            "status",
            "joined_on",
        ]);
        for member in members {
            csv.write_row([
                member.id.to_string(),
                member.name,
                member.email.unwrap_or_default(),
                member.phone.unwrap_or_default(),
                member.line_user_id.unwrap_or_default(),
                enum_label(&member.role),
                enum_label(&member.status),
                member
                    .joined_on
                    .map(|date| date.to_string())
                    .unwrap_or_default(),
            ]);
        }

        Ok(csv.finish())
    }

    /// Check-ins of an event with member names as CSV
    pub async fn event_checkins_csv(&self, event_id: i32) -> Result<String, Error> {
        let event = resolve_event(self.db, event_id).await?;
        let checkins = CheckinRepository::new(self.db)
            .list_with_members(event.id)
            .await?;

        let mut csv = CsvWriter::new();
        csv.write_row([
            "checkin_id",
            "member_id",
            "member_name",
            "checked_in_at",
            "device_info",
        ]);
        for (checkin, member) in checkins {
            csv.write_row([
                checkin.id.to_string(),
                checkin.member_id.to_string(),
                member.map(|member| member.name).unwrap_or_default(),
                checkin.checked_in_at.format(CSV_DATETIME_FORMAT).to_string(),
                checkin.device_info.unwrap_or_default(),
            ]);
        }

        Ok(csv.finish())
    }
}
