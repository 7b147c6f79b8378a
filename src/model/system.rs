use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// Single pass/fail line of a diagnostics report
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DiagnosticCheckDto {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct RecordCountsDto {
    pub members: u64,
    pub events: u64,
    pub registrations: u64,
    pub checkins: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SystemStatusDto {
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: Vec<DiagnosticCheckDto>,
    pub counts: Option<RecordCountsDto>,
}
