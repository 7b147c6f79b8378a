use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_member::Member;

static IDX_MESSAGE_LOG_LINE_USER_ID: &str = "idx-message_log-line_user_id";
static FK_MESSAGE_LOG_MEMBER_ID: &str = "fk-message_log-member_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MessageLog::Table)
                    .if_not_exists()
                    .col(pk_auto(MessageLog::Id))
                    .col(string_len(MessageLog::Direction, 16))
                    .col(string_null(MessageLog::LineUserId))
                    .col(integer_null(MessageLog::MemberId))
                    .col(string(MessageLog::MessageType))
                    .col(text(MessageLog::Content))
                    .col(timestamp(MessageLog::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_MESSAGE_LOG_LINE_USER_ID)
                    .table(MessageLog::Table)
                    .col(MessageLog::LineUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_MESSAGE_LOG_MEMBER_ID)
                    .from_tbl(MessageLog::Table)
                    .from_col(MessageLog::MemberId)
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
                    .name(FK_MESSAGE_LOG_MEMBER_ID)
                    .table(MessageLog::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_MESSAGE_LOG_LINE_USER_ID)
                    .table(MessageLog::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MessageLog::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum MessageLog {
    Table,
    Id,
    Direction,
    LineUserId,
    MemberId,
    MessageType,
    Content,
    CreatedAt,
}
