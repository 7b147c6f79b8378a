use chrono::Utc;
use entity::sea_orm_active_enums::PushStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Outcome of a push request to record
#[derive(Clone, Debug)]
pub struct NewPushRecord {
    pub template_id: Option<i32>,
    pub event_id: Option<i32>,
    pub title: Option<String>,
    pub content: String,
    pub target: String,
    pub recipient_count: i32,
    pub success_count: i32,
    pub failure_count: i32,
    pub status: PushStatus,
}

pub struct PushRecordRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PushRecordRepository<'a, C> {
    /// Creates a new instance of [`PushRecordRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, record: NewPushRecord) -> Result<entity::push_record::Model, DbErr> {
        let record = entity::push_record::ActiveModel {
            template_id: ActiveValue::Set(record.template_id),
            event_id: ActiveValue::Set(record.event_id),
            title: ActiveValue::Set(record.title),
            content: ActiveValue::Set(record.content),
            target: ActiveValue::Set(record.target),
            recipient_count: ActiveValue::Set(record.recipient_count),
            success_count: ActiveValue::Set(record.success_count),
            failure_count: ActiveValue::Set(record.failure_count),
            status: ActiveValue::Set(record.status),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        record.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::push_record::Model>, DbErr> {
        entity::prelude::PushRecord::find_by_id(id)
            .one(self.db)
            .await
    }

    /// Latest records first
    pub async fn list(&self, limit: u64) -> Result<Vec<entity::push_record::Model>, DbErr> {
        entity::prelude::PushRecord::find()
            .order_by_desc(entity::push_record::Column::CreatedAt)
            .order_by_desc(entity::push_record::Column::Id)
            .limit(limit)
            .all(self.db)
            .await
    }

    /// Number of pushes which reached at least one recipient
    pub async fn count_delivered(&self) -> Result<u64, DbErr> {
        entity::prelude::PushRecord::find()
            .filter(entity::push_record::Column::Status.ne(PushStatus::Failed))
            .count(self.db)
            .await
    }
}
