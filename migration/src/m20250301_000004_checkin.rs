use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20250301_000001_member::Member, m20250301_000002_event::Event};

// Backs the one-checkin-per-member-per-event rule, concurrent duplicate
// requests fail on insert instead of racing past the existence check.
static IDX_CHECKIN_MEMBER_EVENT: &str = "idx-checkin-member_id-event_id";
static IDX_CHECKIN_EVENT_ID: &str = "idx-checkin-event_id";
static FK_CHECKIN_MEMBER_ID: &str = "fk-checkin-member_id";
static FK_CHECKIN_EVENT_ID: &str = "fk-checkin-event_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Checkin::Table)
                    .if_not_exists()
                    .col(pk_auto(Checkin::Id))
                    .col(integer(Checkin::MemberId))
                    .col(integer(Checkin::EventId))
                    .col(timestamp(Checkin::CheckedInAt))
                    .col(string_null(Checkin::DeviceInfo))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CHECKIN_MEMBER_EVENT)
                    .table(Checkin::Table)
                    .col(Checkin::MemberId)
                    .col(Checkin::EventId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CHECKIN_EVENT_ID)
                    .table(Checkin::Table)
                    .col(Checkin::EventId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CHECKIN_MEMBER_ID)
                    .from_tbl(Checkin::Table)
                    .from_col(Checkin::MemberId)
                    .to_tbl(Member::Table)
                    .to_col(Member::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_CHECKIN_EVENT_ID)
                    .from_tbl(Checkin::Table)
                    .from_col(Checkin::EventId)
                    .to_tbl(Event::Table)
                    .to_col(Event::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_CHECKIN_EVENT_ID)
                    .table(Checkin::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_CHECKIN_MEMBER_ID)
                    .table(Checkin::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CHECKIN_EVENT_ID)
                    .table(Checkin::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_CHECKIN_MEMBER_EVENT)
                    .table(Checkin::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Checkin::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Checkin {
    Table,
    Id,
    MemberId,
    EventId,
    CheckedInAt,
    DeviceInfo,
}
