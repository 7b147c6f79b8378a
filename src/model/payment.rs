use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::PaymentStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentDto {
    pub id: i32,
    pub member_id: i32,
    pub event_id: Option<i32>,
    pub amount: i64,
    pub currency: String,
    pub method: Option<String>,
    #[schema(value_type = String, example = "pending")]
    pub status: PaymentStatus,
    pub note: Option<String>,
    pub paid_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<entity::payment::Model> for PaymentDto {
    fn from(payment: entity::payment::Model) -> Self {
        Self {
            id: payment.id,
            member_id: payment.member_id,
            event_id: payment.event_id,
            amount: payment.amount,
            currency: payment.currency,
            method: payment.method,
            status: payment.status,
            note: payment.note,
            paid_at: payment.paid_at,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentDto {
    pub member_id: i32,
    pub event_id: Option<i32>,
    pub amount: i64,
    /// ISO 4217 code, defaults to TWD
    pub currency: Option<String>,
    pub method: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<PaymentStatus>,
    pub note: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePaymentDto {
    pub amount: Option<i64>,
    pub method: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<PaymentStatus>,
    pub note: Option<String>,
}
