use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PushTemplate::Table)
                    .if_not_exists()
                    .col(pk_auto(PushTemplate::Id))
                    .col(string_uniq(PushTemplate::Name))
                    .col(string(PushTemplate::Title))
                    .col(text(PushTemplate::Content))
                    .col(timestamp(PushTemplate::CreatedAt))
                    .col(timestamp(PushTemplate::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PushTemplate::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum PushTemplate {
    Table,
    Id,
    Name,
    Title,
    Content,
    CreatedAt,
    UpdatedAt,
}
