use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DbErr, DeleteResult, EntityTrait, QueryOrder,
};

/// Metadata of a stored upload
#[derive(Clone, Debug)]
pub struct NewFile {
    pub original_name: String,
    pub stored_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub event_id: Option<i32>,
    pub member_id: Option<i32>,
}

pub struct FileRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> FileRepository<'a, C> {
    /// Creates a new instance of [`FileRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, file: NewFile) -> Result<entity::file::Model, DbErr> {
        let file = entity::file::ActiveModel {
            original_name: ActiveValue::Set(file.original_name),
            stored_name: ActiveValue::Set(file.stored_name),
            content_type: ActiveValue::Set(file.content_type),
            size_bytes: ActiveValue::Set(file.size_bytes),
            event_id: ActiveValue::Set(file.event_id),
            member_id: ActiveValue::Set(file.member_id),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        file.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::file::Model>, DbErr> {
        entity::prelude::File::find_by_id(id).one(self.db).await
    }

    /// Newest uploads first
    pub async fn list(&self) -> Result<Vec<entity::file::Model>, DbErr> {
        entity::prelude::File::find()
            .order_by_desc(entity::file::Column::CreatedAt)
            .order_by_desc(entity::file::Column::Id)
            .all(self.db)
            .await
    }

    /// Deletes the file row
    ///
    /// Returns OK regardless of the file existing, check
    /// [`DeleteResult::rows_affected`] to confirm the deletion.
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::File::delete_by_id(id).exec(self.db).await
    }
}
