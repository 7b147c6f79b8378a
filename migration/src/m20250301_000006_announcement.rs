use sea_orm_migration::{prelude::*, schema::*};

static IDX_ANNOUNCEMENT_STATUS_SCHEDULED_AT: &str = "idx-announcement-status-scheduled_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Announcement::Table)
                    .if_not_exists()
                    .col(pk_auto(Announcement::Id))
                    .col(string(Announcement::Title))
                    .col(text(Announcement::Content))
                    .col(string_len(Announcement::Status, 16).default("draft"))
                    .col(boolean(Announcement::PushToLine).default(false))
                    .col(timestamp_null(Announcement::ScheduledAt))
                    .col(timestamp_null(Announcement::PublishedAt))
                    .col(timestamp(Announcement::CreatedAt))
                    .col(timestamp(Announcement::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ANNOUNCEMENT_STATUS_SCHEDULED_AT)
                    .table(Announcement::Table)
                    .col(Announcement::Status)
                    .col(Announcement::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ANNOUNCEMENT_STATUS_SCHEDULED_AT)
                    .table(Announcement::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Announcement::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Announcement {
    Table,
    Id,
    Title,
    Content,
    Status,
    PushToLine,
    ScheduledAt,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}
