use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::model::push::{CreatePushTemplateDto, UpdatePushTemplateDto};

pub struct PushTemplateRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PushTemplateRepository<'a, C> {
    /// Creates a new instance of [`PushTemplateRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a template, fails with a unique constraint violation on a duplicate name
    pub async fn create(
        &self,
        template: CreatePushTemplateDto,
    ) -> Result<entity::push_template::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let template = entity::push_template::ActiveModel {
            name: ActiveValue::Set(template.name),
            title: ActiveValue::Set(template.title),
            content: ActiveValue::Set(template.content),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        template.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::push_template::Model>, DbErr> {
        entity::prelude::PushTemplate::find_by_id(id)
            .one(self.db)
            .await
    }

    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<entity::push_template::Model>, DbErr> {
        entity::prelude::PushTemplate::find()
            .filter(entity::push_template::Column::Name.eq(name))
            .one(self.db)
            .await
    }

    pub async fn list(&self) -> Result<Vec<entity::push_template::Model>, DbErr> {
        entity::prelude::PushTemplate::find()
            .order_by_asc(entity::push_template::Column::Name)
            .all(self.db)
            .await
    }

    /// Applies the fields present in `changes`
    ///
    /// Returns `Ok(None)` when the template does not exist.
    pub async fn update(
        &self,
        id: i32,
        changes: UpdatePushTemplateDto,
    ) -> Result<Option<entity::push_template::Model>, DbErr> {
        let Some(template) = self.get(id).await? else {
            return Ok(None);
        };

        let mut template = template.into_active_model();

        if let Some(name) = changes.name {
            template.name = ActiveValue::Set(name);
        }
        if let Some(title) = changes.title {
            template.title = ActiveValue::Set(title);
        }
        if let Some(content) = changes.content {
            template.content = ActiveValue::Set(content);
        }
        template.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(template.update(self.db).await?))
    }

    /// Deletes a template
    ///
    /// Returns OK regardless of the template existing, check
    /// [`DeleteResult::rows_affected`] to confirm the deletion.
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::PushTemplate::delete_by_id(id)
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use lionsclub_test_utils::prelude::*;
    use sea_orm::SqlErr;

    use crate::{
        model::push::{CreatePushTemplateDto, UpdatePushTemplateDto},
        server::data::push_template::PushTemplateRepository,
    };

    fn template(name: &str) -> CreatePushTemplateDto {
        CreatePushTemplateDto {
            name: name.to_string(),
            title: "Reminder".to_string(),
            content: "Hi {{name}}, see you at {{event_title}}".to_string(),
        }
    }

    /// Expect duplicate names to violate the unique constraint
    #[tokio::test]
    async fn rejects_duplicate_name() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::PushTemplate)?;
        let repo = PushTemplateRepository::new(&test.db);

        repo.create(template("reminder")).await?;
        let err = repo.create(template("reminder")).await.unwrap_err();

        assert!(matches!(
            err.sql_err(),
            Some(SqlErr::UniqueConstraintViolation(_))
        ));

        Ok(())
    }

    /// Expect update to change content and keep name
    #[tokio::test]
    async fn updates_content() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::PushTemplate)?;
        let repo = PushTemplateRepository::new(&test.db);
        let created = repo.create(template("reminder")).await?;

        let updated = repo
            .update(
                created.id,
                UpdatePushTemplateDto {
                    content: Some("Hello {{name}}".to_string()),
                    ..Default::default()
                },
            )
            .await?
            .unwrap();

        assert_eq!(updated.name, "reminder");
        assert_eq!(updated.content, "Hello {{name}}");
        assert!(repo.find_by_name("reminder").await?.is_some());

        Ok(())
    }

    /// Expect delete to remove the template
    #[tokio::test]
    async fn deletes_template() -> Result<(), TestError> {
        let test = test_setup_with_tables!(entity::prelude::PushTemplate)?;
        let repo = PushTemplateRepository::new(&test.db);
        let created = repo.create(template("reminder")).await?;

        let result = repo.delete(created.id).await?;

        assert_eq!(result.rows_affected, 1);
        assert!(repo.list().await?.is_empty());

        Ok(())
    }
}
