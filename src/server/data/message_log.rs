use chrono::Utc;
use entity::sea_orm_active_enums::MessageDirection;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// A message to record in the log
#[derive(Clone, Debug)]
pub struct NewMessageLog {
    pub direction: MessageDirection,
    pub line_user_id: Option<String>,
    pub member_id: Option<i32>,
    /// `text`, `follow`, `postback`, `push`, ...
    pub message_type: String,
    pub content: String,
}

pub struct MessageLogRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MessageLogRepository<'a, C> {
    /// Creates a new instance of [`MessageLogRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, log: NewMessageLog) -> Result<entity::message_log::Model, DbErr> {
        let log = entity::message_log::ActiveModel {
            direction: ActiveValue::Set(log.direction),
            line_user_id: ActiveValue::Set(log.line_user_id),
            member_id: ActiveValue::Set(log.member_id),
            message_type: ActiveValue::Set(log.message_type),
            content: ActiveValue::Set(log.content),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        log.insert(self.db).await
    }

    /// Inserts many log entries at once, used for push fan-out
    pub async fn create_many(&self, logs: Vec<NewMessageLog>) -> Result<(), DbErr> {
        if logs.is_empty() {
            return Ok(());
        }

        let now = Utc::now().naive_utc();
        let logs = logs.into_iter().map(|log| entity::message_log::ActiveModel {
            direction: ActiveValue::Set(log.direction),
            line_user_id: ActiveValue::Set(log.line_user_id),
            member_id: ActiveValue::Set(log.member_id),
            message_type: ActiveValue::Set(log.message_type),
            content: ActiveValue::Set(log.content),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        });

        entity::prelude::MessageLog::insert_many(logs)
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Latest messages first
    pub async fn list(
        &self,
        line_user_id: Option<&str>,
        direction: Option<MessageDirection>,
        limit: u64,
    ) -> Result<Vec<entity::message_log::Model>, DbErr> {
        let mut condition = Condition::all();

        if let Some(line_user_id) = line_user_id {
            condition = condition.add(entity::message_log::Column::LineUserId.eq(line_user_id));
        }
        if let Some(direction) = direction {
            condition = condition.add(entity::message_log::Column::Direction.eq(direction));
        }

        entity::prelude::MessageLog::find()
            .filter(condition)
            .order_by_desc(entity::message_log::Column::CreatedAt)
            .order_by_desc(entity::message_log::Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use entity::sea_orm_active_enums::MessageDirection;
    use lionsclub_test_utils::prelude::*;

    use crate::server::data::message_log::{MessageLogRepository, NewMessageLog};

    fn log(direction: MessageDirection, user: &str) -> NewMessageLog {
        NewMessageLog {
            direction,
            line_user_id: Some(user.to_string()),
            member_id: None,
            message_type: "text".to_string(),
            content: "hello".to_string(),
        }
    }

    /// Expect filters and limit to apply, newest first
    #[tokio::test]
    async fn lists_with_filters() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::Member)
            .with_table(entity::prelude::MessageLog)
            .build()
            .await?;
        let repo = MessageLogRepository::new(&test.db);

        repo.create(log(MessageDirection::Inbound, "U1")).await?;
        repo.create_many(vec![
            log(MessageDirection::Outbound, "U1"),
            log(MessageDirection::Outbound, "U2"),
        ])
        .await?;

        let for_u1 = repo.list(Some("U1"), None, 50).await?;
        let outbound = repo
            .list(None, Some(MessageDirection::Outbound), 50)
            .await?;
        let limited = repo.list(None, None, 1).await?;

        assert_eq!(for_u1.len(), 2);
        assert_eq!(outbound.len(), 2);
        assert_eq!(limited.len(), 1);

        Ok(())
    }

    /// Expect inserting nothing to be a no-op
    #[tokio::test]
    async fn create_many_accepts_empty() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::MessageLog)?;
        let repo = MessageLogRepository::new(&test.db);

        assert!(repo.create_many(Vec::new()).await.is_ok());

        Ok(())
    }
}
