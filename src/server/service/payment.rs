use entity::sea_orm_active_enums::PaymentStatus;
use sea_orm::DatabaseConnection;

use crate::{
    model::payment::{CreatePaymentDto, PaymentDto, UpdatePaymentDto},
    server::{
        data::payment::PaymentRepository,
        error::Error,
        service::{
            event::resolve_event,
            member::{resolve_member, MemberRef},
        },
    },
};

fn validate_amount(amount: i64) -> Result<(), Error> {
    if amount < 0 {
        return Err(Error::Validation("amount must not be negative".to_string()));
    }

    Ok(())
}

pub struct PaymentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PaymentService<'a> {
    /// Creates a new instance of [`PaymentService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        member_id: Option<i32>,
        event_id: Option<i32>,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<PaymentDto>, Error> {
        let payments = PaymentRepository::new(self.db)
            .list(member_id, event_id, status)
            .await?;

        Ok(payments.into_iter().map(PaymentDto::from).collect())
    }

    pub async fn get(&self, payment_id: i32) -> Result<PaymentDto, Error> {
        let payment = PaymentRepository::new(self.db)
            .get(payment_id)
            .await?
            .ok_or_else(|| Error::NotFound("Payment".to_string()))?;

        Ok(payment.into())
    }

    /// Records a payment for an existing member and, optionally, event
    pub async fn create(&self, payment: CreatePaymentDto) -> Result<PaymentDto, Error> {
        validate_amount(payment.amount)?;
        resolve_member(self.db, &MemberRef::Id(payment.member_id)).await?;
        if let Some(event_id) = payment.event_id {
            resolve_event(self.db, event_id).await?;
        }

        let payment = PaymentRepository::new(self.db).create(payment).await?;

        tracing::info!(
            payment_id = %payment.id,
            member_id = %payment.member_id,
            "Recorded payment of {} {}",
            payment.amount,
            payment.currency
        );

        Ok(payment.into())
    }

    pub async fn update(
        &self,
        payment_id: i32,
        changes: UpdatePaymentDto,
    ) -> Result<PaymentDto, Error> {
        if let Some(amount) = changes.amount {
            validate_amount(amount)?;
        }

        let payment = PaymentRepository::new(self.db)
            .update(payment_id, changes)
            .await?
            .ok_or_else(|| Error::NotFound("Payment".to_string()))?;

        Ok(payment.into())
    }
}

#[cfg(test)]
mod tests {
    mod create {
        use lionsclub_test_utils::prelude::*;

        use crate::{
            model::payment::CreatePaymentDto,
            server::{
                error::{member::MemberError, Error},
                service::payment::PaymentService,
            },
        };

        fn dues(member_id: i32, amount: i64) -> CreatePaymentDto {
            CreatePaymentDto {
                member_id,
                event_id: None,
                amount,
                currency: None,
                method: Some("cash".to_string()),
                status: None,
                note: Some("annual dues".to_string()),
            }
        }

        /// Expect a pending payment in the default currency
        #[tokio::test]
        async fn records_payment() -> Result<(), TestError> {
            let mut test = TestBuilder::new()
                .with_core_tables()
                .with_table(entity::prelude::Payment)
                .build()
                .await?;
            let member = test.member().insert_member("Alice", None).await?;

            let payment = PaymentService::new(&test.db)
                .create(dues(member.id, 3000))
                .await
                .unwrap();

            assert_eq!(payment.amount, 3000);
            assert_eq!(payment.currency, "TWD");
            assert!(payment.paid_at.is_none());

            Ok(())
        }

        /// Expect MemberError::NotFound for an unknown member
        #[tokio::test]
        async fn fails_for_unknown_member() -> Result<(), TestError> {
            let test = TestBuilder::new()
                .with_core_tables()
                .with_table(entity::prelude::Payment)
                .build()
                .await?;

            let result = PaymentService::new(&test.db).create(dues(4, 3000)).await;

            assert!(matches!(
                result,
                Err(Error::MemberError(MemberError::NotFound(_)))
            ));

            Ok(())
        }

        /// Expect Validation for a negative amount
        #[tokio::test]
        async fn rejects_negative_amount() -> Result<(), TestError> {
            let mut test = TestBuilder::new()
                .with_core_tables()
                .with_table(entity::prelude::Payment)
                .build()
                .await?;
            let member = test.member().insert_member("Alice", None).await?;

            let result = PaymentService::new(&test.db)
                .create(dues(member.id, -1))
                .await;

            assert!(matches!(result, Err(Error::Validation(_))));

            Ok(())
        }
    }

    mod update {
        use entity::sea_orm_active_enums::PaymentStatus;
        use lionsclub_test_utils::prelude::*;

        use crate::{
            model::payment::UpdatePaymentDto,
            server::{error::Error, service::payment::PaymentService},
        };

        /// Expect NotFound for an unknown payment
        #[tokio::test]
        async fn fails_for_unknown_payment() -> Result<(), TestError> {
            let test = TestBuilder::new()
                .with_core_tables()
                .with_table(entity::prelude::Payment)
                .build()
                .await?;

            let result = PaymentService::new(&test.db)
                .update(
                    1,
                    UpdatePaymentDto {
                        status: Some(PaymentStatus::Paid),
                        ..Default::default()
                    },
                )
                .await;

            assert!(matches!(result, Err(Error::NotFound(_))));

            Ok(())
        }
    }
}
