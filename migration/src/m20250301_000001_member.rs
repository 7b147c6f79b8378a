use sea_orm_migration::{prelude::*, schema::*};

static IDX_MEMBER_STATUS: &str = "idx-member-status";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(pk_auto(Member::Id))
                    .col(string(Member::Name))
                    .col(string_null(Member::Email))
                    .col(string_null(Member::Phone))
                    .col(string_null(Member::LineUserId).unique_key())
                    .col(string_null(Member::LineDisplayName))
                    .col(string_len(Member::Role, 16).default("member"))
                    .col(string_len(Member::Status, 16).default("active"))
                    .col(date_null(Member::JoinedOn))
                    .col(timestamp(Member::CreatedAt))
                    .col(timestamp(Member::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MEMBER_STATUS)
                    .table(Member::Table)
                    .col(Member::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MEMBER_STATUS)
                    .table(Member::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Member::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Member {
    Table,
    Id,
    Name,
    Email,
    Phone,
    LineUserId,
    LineDisplayName,
    Role,
    Status,
    JoinedOn,
    CreatedAt,
    UpdatedAt,
}
