use chrono::Utc;
use entity::sea_orm_active_enums::PaymentStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::model::payment::{CreatePaymentDto, UpdatePaymentDto};

/// Currency used when a payment doesn't specify one
pub const DEFAULT_CURRENCY: &str = "TWD";

pub struct PaymentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PaymentRepository<'a, C> {
    /// Creates a new instance of [`PaymentRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Records a payment, a payment created as `paid` is stamped with `paid_at`
    pub async fn create(&self, payment: CreatePaymentDto) -> Result<entity::payment::Model, DbErr> {
        let now = Utc::now().naive_utc();
        let status = payment.status.unwrap_or(PaymentStatus::Pending);

        let payment = entity::payment::ActiveModel {
            member_id: ActiveValue::Set(payment.member_id),
            event_id: ActiveValue::Set(payment.event_id),
            amount: ActiveValue::Set(payment.amount),
            currency: ActiveValue::Set(
                payment
                    .currency
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            ),
            method: ActiveValue::Set(payment.method),
            status: ActiveValue::Set(status),
            note: ActiveValue::Set(payment.note),
            paid_at: ActiveValue::Set((status == PaymentStatus::Paid).then_some(now)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        payment.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::payment::Model>, DbErr> {
        entity::prelude::Payment::find_by_id(id).one(self.db).await
    }

    /// Lists payments, newest first
    pub async fn list(
        &self,
        member_id: Option<i32>,
        event_id: Option<i32>,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<entity::payment::Model>, DbErr> {
        let mut condition = Condition::all();

        if let Some(member_id) = member_id {
            condition = condition.add(entity::payment::Column::MemberId.eq(member_id));
        }
        if let Some(event_id) = event_id {
            condition = condition.add(entity::payment::Column::EventId.eq(event_id));
        }
        if let Some(status) = status {
            condition = condition.add(entity::payment::Column::Status.eq(status));
        }

        entity::prelude::Payment::find()
            .filter(condition)
            .order_by_desc(entity::payment::Column::CreatedAt)
            .order_by_desc(entity::payment::Column::Id)
            .all(self.db)
            .await
    }

    /// Applies the fields present in `changes`
    ///
    /// Moving a payment to `paid` stamps `paid_at` unless it was already set.
    /// Returns `Ok(None)` when the payment does not exist.
    pub async fn update(
        &self,
        id: i32,
        changes: UpdatePaymentDto,
    ) -> Result<Option<entity::payment::Model>, DbErr> {
        let Some(payment) = self.get(id).await? else {
            return Ok(None);
        };

        let now = Utc::now().naive_utc();
        let already_paid = payment.paid_at.is_some();
        let mut payment = payment.into_active_model();

        if let Some(amount) = changes.amount {
            payment.amount = ActiveValue::Set(amount);
        }
        if let Some(method) = changes.method {
            payment.method = ActiveValue::Set(Some(method));
        }
        if let Some(note) = changes.note {
            payment.note = ActiveValue::Set(Some(note));
        }
        if let Some(status) = changes.status {
            payment.status = ActiveValue::Set(status);
            if status == PaymentStatus::Paid && !already_paid {
                payment.paid_at = ActiveValue::Set(Some(now));
            }
        }
        payment.updated_at = ActiveValue::Set(now);

        Ok(Some(payment.update(self.db).await?))
    }
}
