use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20250301_000001_member::Member, m20250301_000002_event::Event};

static IDX_PAYMENT_MEMBER_ID: &str = "idx-payment-member_id";
static FK_PAYMENT_MEMBER_ID: &str = "fk-payment-member_id";
static FK_PAYMENT_EVENT_ID: &str = "fk-payment-event_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(pk_auto(Payment::Id))
                    .col(integer(Payment::MemberId))
                    .col(integer_null(Payment::EventId))
                    .col(big_integer(Payment::Amount))
                    .col(string_len(Payment::Currency, 3).default("TWD"))
                    .col(string_null(Payment::Method))
                    .col(string_len(Payment::Status, 16))
                    .col(string_null(Payment::Note))
                    .col(timestamp_null(Payment::PaidAt))
                    .col(timestamp(Payment::CreatedAt))
                    .col(timestamp(Payment::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PAYMENT_MEMBER_ID)
                    .table(Payment::Table)
                    .col(Payment::MemberId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PAYMENT_MEMBER_ID)
                    .from_tbl(Payment::Table)
                    .from_col(Payment::MemberId)
                    .to_tbl(Member::Table)
                    .to_col(Member::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PAYMENT_EVENT_ID)
                    .from_tbl(Payment::Table)
                    .from_col(Payment::EventId)
                    .to_tbl(Event::Table)
                    .to_col(Event::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PAYMENT_EVENT_ID)
                    .table(Payment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PAYMENT_MEMBER_ID)
                    .table(Payment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PAYMENT_MEMBER_ID)
                    .table(Payment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Payment::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Payment {
    Table,
    Id,
    MemberId,
    EventId,
    Amount,
    Currency,
    Method,
    Status,
    Note,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}
