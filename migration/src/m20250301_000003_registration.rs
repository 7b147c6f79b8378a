use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20250301_000001_member::Member, m20250301_000002_event::Event};

static IDX_REGISTRATION_MEMBER_EVENT: &str = "idx-registration-member_id-event_id";
static IDX_REGISTRATION_EVENT_ID: &str = "idx-registration-event_id";
static FK_REGISTRATION_MEMBER_ID: &str = "fk-registration-member_id";
static FK_REGISTRATION_EVENT_ID: &str = "fk-registration-event_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registration::Table)
                    .if_not_exists()
                    .col(pk_auto(Registration::Id))
                    .col(integer(Registration::MemberId))
                    .col(integer(Registration::EventId))
                    .col(string_len(Registration::Status, 16))
                    .col(string_null(Registration::Notes))
                    .col(timestamp(Registration::CreatedAt))
                    .col(timestamp(Registration::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_REGISTRATION_MEMBER_EVENT)
                    .table(Registration::Table)
                    .col(Registration::MemberId)
                    .col(Registration::EventId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_REGISTRATION_EVENT_ID)
                    .table(Registration::Table)
                    .col(Registration::EventId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REGISTRATION_MEMBER_ID)
                    .from_tbl(Registration::Table)
                    .from_col(Registration::MemberId)
                    .to_tbl(Member::Table)
                    .to_col(Member::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REGISTRATION_EVENT_ID)
                    .from_tbl(Registration::Table)
                    .from_col(Registration::EventId)
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
                    .name(FK_REGISTRATION_EVENT_ID)
                    .table(Registration::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_REGISTRATION_MEMBER_ID)
                    .table(Registration::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_REGISTRATION_EVENT_ID)
                    .table(Registration::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_REGISTRATION_MEMBER_EVENT)
                    .table(Registration::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Registration::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Registration {
    Table,
    Id,
    MemberId,
    EventId,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}
