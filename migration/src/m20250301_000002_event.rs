use sea_orm_migration::{prelude::*, schema::*};

static IDX_EVENT_STARTS_AT: &str = "idx-event-starts_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(pk_auto(Event::Id))
                    .col(string(Event::Title))
                    .col(text_null(Event::Description))
                    .col(string_null(Event::Location))
                    .col(timestamp(Event::StartsAt))
                    .col(timestamp_null(Event::EndsAt))
                    .col(integer_null(Event::Capacity))
                    .col(string_len(Event::Status, 16).default("upcoming"))
                    .col(timestamp(Event::CreatedAt))
                    .col(timestamp(Event::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_EVENT_STARTS_AT)
                    .table(Event::Table)
                    .col(Event::StartsAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_EVENT_STARTS_AT)
                    .table(Event::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Event {
    Table,
    Id,
    Title,
    Description,
    Location,
    StartsAt,
    EndsAt,
    Capacity,
    Status,
    CreatedAt,
    UpdatedAt,
}
