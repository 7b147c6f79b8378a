use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20250301_000001_member::Member, m20250301_000002_event::Event};

static FK_FILE_EVENT_ID: &str = "fk-file-event_id";
static FK_FILE_MEMBER_ID: &str = "fk-file-member_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(File::Table)
                    .if_not_exists()
                    .col(pk_auto(File::Id))
                    .col(string(File::OriginalName))
                    .col(string_uniq(File::StoredName))
                    .col(string(File::ContentType))
                    .col(big_integer(File::SizeBytes))
                    .col(integer_null(File::EventId))
                    .col(integer_null(File::MemberId))
                    .col(timestamp(File::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_FILE_EVENT_ID)
                    .from_tbl(File::Table)
                    .from_col(File::EventId)
                    .to_tbl(Event::Table)
                    .to_col(Event::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_FILE_MEMBER_ID)
                    .from_tbl(File::Table)
                    .from_col(File::MemberId)
                    .to_tbl(Member::Table)
                    .to_col(Member::Id)
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
                    .name(FK_FILE_MEMBER_ID)
                    .table(File::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_FILE_EVENT_ID)
                    .table(File::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(File::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum File {
    Table,
    Id,
    OriginalName,
    StoredName,
    ContentType,
    SizeBytes,
    EventId,
    MemberId,
    CreatedAt,
}
