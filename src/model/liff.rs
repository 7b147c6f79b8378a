use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{checkin::CheckinDto, member::MemberDto, registration::RegistrationDto};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LiffConfigDto {
    pub liff_id: Option<String>,
}

/// Self registration submitted from the LIFF mini app
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LiffRegisterDto {
    pub line_user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LiffProfileDto {
    pub member: MemberDto,
    pub registrations: Vec<RegistrationDto>,
    pub checkins: Vec<CheckinDto>,
}
