use chrono::{NaiveDate, NaiveDateTime};
use entity::sea_orm_active_enums::{MemberRole, MemberStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberDto {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub line_user_id: Option<String>,
    pub line_display_name: Option<String>,
    #[schema(value_type = String, example = "member")]
    pub role: MemberRole,
    #[schema(value_type = String, example = "active")]
    pub status: MemberStatus,
    pub joined_on: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::member::Model> for MemberDto {
    fn from(member: entity::member::Model) -> Self {
        Self {
            id: member.id,
            name: member.name,
            email: member.email,
            phone: member.phone,
            line_user_id: member.line_user_id,
            line_display_name: member.line_display_name,
            role: member.role,
            status: member.status,
            joined_on: member.joined_on,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

/// Name and role of a member, embedded in check-in results
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberSummaryDto {
    pub id: i32,
    pub name: String,
    #[schema(value_type = String, example = "member")]
    pub role: MemberRole,
}

impl From<&entity::member::Model> for MemberSummaryDto {
    fn from(member: &entity::member::Model) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            role: member.role,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMemberDto {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub line_user_id: Option<String>,
    #[schema(value_type = Option<String>)]
    pub role: Option<MemberRole>,
    pub joined_on: Option<NaiveDate>,
}

/// Partial member update, absent fields are left unchanged
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMemberDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub line_user_id: Option<String>,
    #[schema(value_type = Option<String>)]
    pub role: Option<MemberRole>,
    #[schema(value_type = Option<String>)]
    pub status: Option<MemberStatus>,
    pub joined_on: Option<NaiveDate>,
}
