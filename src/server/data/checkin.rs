use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

pub struct CheckinRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CheckinRepository<'a, C> {
    /// Creates a new instance of [`CheckinRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a check-in stamped with the current time
    ///
    /// Fails with a unique constraint violation when the member already checked in
    /// to the event.
    pub async fn create(
        &self,
        member_id: i32,
        event_id: i32,
        device_info: Option<String>,
    ) -> Result<entity::checkin::Model, DbErr> {
        let checkin = entity::checkin::ActiveModel {
            member_id: ActiveValue::Set(member_id),
            event_id: ActiveValue::Set(event_id),
            checked_in_at: ActiveValue::Set(Utc::now().naive_utc()),
            device_info: ActiveValue::Set(device_info),
            ..Default::default()
        };

        checkin.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::checkin::Model>, DbErr> {
        entity::prelude::Checkin::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_member_and_event(
        &self,
        member_id: i32,
        event_id: i32,
    ) -> Result<Option<entity::checkin::Model>, DbErr> {
        entity::prelude::Checkin::find()
            .filter(entity::checkin::Column::MemberId.eq(member_id))
            .filter(entity::checkin::Column::EventId.eq(event_id))
            .one(self.db)
            .await
    }

    /// Lists check-ins ordered by check-in time
    pub async fn list(
        &self,
        event_id: Option<i32>,
        member_id: Option<i32>,
    ) -> Result<Vec<entity::checkin::Model>, DbErr> {
        let mut condition = Condition::all();

        if let Some(event_id) = event_id {
            condition = condition.add(entity::checkin::Column::EventId.eq(event_id));
        }
        if let Some(member_id) = member_id {
            condition = condition.add(entity::checkin::Column::MemberId.eq(member_id));
        }

        entity::prelude::Checkin::find()
            .filter(condition)
            .order_by_asc(entity::checkin::Column::CheckedInAt)
            .order_by_asc(entity::checkin::Column::Id)
            .all(self.db)
            .await
    }

    /// Check-ins of an event together with their members, ordered by check-in time
    pub async fn list_with_members(
        &self,
        event_id: i32,
    ) -> Result<Vec<(entity::checkin::Model, Option<entity::member::Model>)>, DbErr> {
        entity::prelude::Checkin::find()
            .filter(entity::checkin::Column::EventId.eq(event_id))
            .find_also_related(entity::prelude::Member)
            .order_by_asc(entity::checkin::Column::CheckedInAt)
            .order_by_asc(entity::checkin::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn count_by_event(&self, event_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Checkin::find()
            .filter(entity::checkin::Column::EventId.eq(event_id))
            .count(self.db)
            .await
    }

    pub async fn count_since(&self, since: NaiveDateTime) -> Result<u64, DbErr> {
        entity::prelude::Checkin::find()
            .filter(entity::checkin::Column::CheckedInAt.gte(since))
            .count(self.db)
            .await
    }

    pub async fn count_all(&self) -> Result<u64, DbErr> {
        entity::prelude::Checkin::find().count(self.db).await
    }

    /// Deletes a check-in
    ///
    /// Returns OK regardless of the check-in existing, check
    /// [`DeleteResult::rows_affected`] to confirm the deletion.
    pub async fn delete(&self, id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Checkin::delete_by_id(id).exec(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use lionsclub_test_utils::prelude::*;
    use sea_orm::SqlErr;

    use crate::server::data::checkin::CheckinRepository;

    async fn setup() -> Result<TestContext, TestError> {
        TestBuilder::new()
            .with_core_tables()
            .with_member(MemberFixture::new("Alice", None))
            .with_member(MemberFixture::new("Bob", None))
            .with_event("Dinner", None)
            .build()
            .await
    }

    mod create {
        use super::*;

        /// Expect a duplicate check-in to surface as a unique constraint violation
        #[tokio::test]
        async fn duplicate_is_unique_violation() -> Result<(), TestError> {
            let test = setup().await?;
            let repo = CheckinRepository::new(&test.db);

            repo.create(1, 1, Some("kiosk".to_string())).await?;
            let err = repo.create(1, 1, None).await.unwrap_err();

            assert!(matches!(
                err.sql_err(),
                Some(SqlErr::UniqueConstraintViolation(_))
            ));

            Ok(())
        }
    }

    mod list_with_members {
        use super::*;

        /// Expect each check-in to be paired with its member
        #[tokio::test]
        async fn pairs_members() -> Result<(), TestError> {
            let test = setup().await?;
            let repo = CheckinRepository::new(&test.db);

            repo.create(2, 1, None).await?;
            repo.create(1, 1, None).await?;

            let rows = repo.list_with_members(1).await?;

            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].1.as_ref().map(|m| m.name.as_str()), Some("Bob"));
            assert_eq!(repo.count_by_event(1).await?, 2);

            Ok(())
        }
    }

    mod delete {
        use super::*;

        /// Expect one row affected and the check-in gone
        #[tokio::test]
        async fn deletes_checkin() -> Result<(), TestError> {
            let test = setup().await?;
            let repo = CheckinRepository::new(&test.db);

            let checkin = repo.create(1, 1, None).await?;
            let result = repo.delete(checkin.id).await?;

            assert_eq!(result.rows_affected, 1);
            assert!(repo.get(checkin.id).await?.is_none());

            Ok(())
        }

        /// Expect no rows affected for unknown check-in
        #[tokio::test]
        async fn no_rows_for_missing() -> Result<(), TestError> {
            let test = setup().await?;
            let repo = CheckinRepository::new(&test.db);

            let result = repo.delete(99).await?;

            assert_eq!(result.rows_affected, 0);

            Ok(())
        }
    }
}
