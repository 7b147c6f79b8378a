use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000008_push_template::PushTemplate;

static FK_PUSH_RECORD_TEMPLATE_ID: &str = "fk-push_record-template_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PushRecord::Table)
                    .if_not_exists()
                    .col(pk_auto(PushRecord::Id))
                    .col(integer_null(PushRecord::TemplateId))
                    .col(integer_null(PushRecord::EventId))
                    .col(string_null(PushRecord::Title))
                    .col(text(PushRecord::Content))
                    .col(string(PushRecord::Target))
                    .col(integer(PushRecord::RecipientCount))
                    .col(integer(PushRecord::SuccessCount))
                    .col(integer(PushRecord::FailureCount))
                    .col(string_len(PushRecord::Status, 16))
                    .col(timestamp(PushRecord::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PUSH_RECORD_TEMPLATE_ID)
                    .from_tbl(PushRecord::Table)
                    .from_col(PushRecord::TemplateId)
                    .to_tbl(PushTemplate::Table)
                    .to_col(PushTemplate::Id)
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
                    .name(FK_PUSH_RECORD_TEMPLATE_ID)
                    .table(PushRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PushRecord::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum PushRecord {
    Table,
    Id,
    TemplateId,
    EventId,
    Title,
    Content,
    Target,
    RecipientCount,
    SuccessCount,
    FailureCount,
    Status,
    CreatedAt,
}
