use chrono::Utc;
use entity::sea_orm_active_enums::{MemberRole, MemberStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::model::member::{CreateMemberDto, UpdateMemberDto};

/// Filters for listing members
#[derive(Clone, Debug, Default)]
pub struct MemberFilter {
    pub status: Option<MemberStatus>,
    pub role: Option<MemberRole>,
    /// Case-sensitive substring of name, email or phone
    pub q: Option<String>,
}

pub struct MemberRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MemberRepository<'a, C> {
    /// Creates a new instance of [`MemberRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a new active member, role defaults to [`MemberRole::Member`]
    pub async fn create(&self, member: CreateMemberDto) -> Result<entity::member::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let member = entity::member::ActiveModel {
            name: ActiveValue::Set(member.name),
            email: ActiveValue::Set(member.email),
            phone: ActiveValue::Set(member.phone),
            line_user_id: ActiveValue::Set(member.line_user_id),
            line_display_name: ActiveValue::Set(None),
            role: ActiveValue::Set(member.role.unwrap_or(MemberRole::Member)),
            status: ActiveValue::Set(MemberStatus::Active),
            joined_on: ActiveValue::Set(Some(member.joined_on.unwrap_or(now.date()))),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        member.insert(self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<entity::member::Model>, DbErr> {
        entity::prelude::Member::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_line_user_id(
        &self,
        line_user_id: &str,
    ) -> Result<Option<entity::member::Model>, DbErr> {
        entity::prelude::Member::find()
            .filter(entity::member::Column::LineUserId.eq(line_user_id))
            .one(self.db)
            .await
    }

    /// Lists members matching `filter` ordered by name
    ///
    /// # Arguments
    /// - `filter` - Status, role and text filters
    /// - `page` - 1-based page number
    /// - `per_page` - Page size
    ///
    /// # Returns
    /// - `Ok((members, total))` - The requested page and the total number of matches
    pub async fn list(
        &self,
        filter: &MemberFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::member::Model>, u64), DbErr> {
        let mut condition = Condition::all();

        if let Some(status) = filter.status {
            condition = condition.add(entity::member::Column::Status.eq(status));
        }
        if let Some(role) = filter.role {
            condition = condition.add(entity::member::Column::Role.eq(role));
        }
        if let Some(q) = filter.q.as_deref().filter(|q| !q.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(entity::member::Column::Name.contains(q))
                    .add(entity::member::Column::Email.contains(q))
                    .add(entity::member::Column::Phone.contains(q)),
            );
        }

        let query = entity::prelude::Member::find().filter(condition);
        let total = query.clone().count(self.db).await?;

        let members = query
            .order_by_asc(entity::member::Column::Name)
            .order_by_asc(entity::member::Column::Id)
            .offset(page.saturating_sub(1).saturating_mul(per_page))
            .limit(per_page)
            .all(self.db)
            .await?;

        Ok((members, total))
    }

    /// All members ordered by ID, used for exports
    pub async fn list_all(&self) -> Result<Vec<entity::member::Model>, DbErr> {
        entity::prelude::Member::find()
            .order_by_asc(entity::member::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<entity::member::Model>, DbErr> {
        entity::prelude::Member::find()
            .filter(entity::member::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(entity::member::Column::Id)
            .all(self.db)
            .await
    }

    /// Active members linked to a LINE account, optionally limited to the given roles
    pub async fn find_line_recipients(
        &self,
        roles: Option<&[MemberRole]>,
    ) -> Result<Vec<entity::member::Model>, DbErr> {
        let mut query = entity::prelude::Member::find()
            .filter(entity::member::Column::Status.eq(MemberStatus::Active))
            .filter(entity::member::Column::LineUserId.is_not_null());

        if let Some(roles) = roles {
            query = query.filter(entity::member::Column::Role.is_in(roles.iter().copied()));
        }

        query
            .order_by_asc(entity::member::Column::Id)
            .all(self.db)
            .await
    }

    /// Applies the fields present in `changes`
    ///
    /// Returns `Ok(None)` when the member does not exist.
    pub async fn update(
        &self,
        id: i32,
        changes: UpdateMemberDto,
    ) -> Result<Option<entity::member::Model>, DbErr> {
        let Some(member) = self.get(id).await? else {
            return Ok(None);
        };

        let mut member = member.into_active_model();

        if let Some(name) = changes.name {
            member.name = ActiveValue::Set(name);
        }
        if let Some(email) = changes.email {
            member.email = ActiveValue::Set(Some(email));
        }
        if let Some(phone) = changes.phone {
            member.phone = ActiveValue::Set(Some(phone));
        }
        if let Some(line_user_id) = changes.line_user_id {
            member.line_user_id = ActiveValue::Set(Some(line_user_id));
        }
        if let Some(role) = changes.role {
            member.role = ActiveValue::Set(role);
        }
        if let Some(status) = changes.status {
            member.status = ActiveValue::Set(status);
        }
        if let Some(joined_on) = changes.joined_on {
            member.joined_on = ActiveValue::Set(Some(joined_on));
        }
        member.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(member.update(self.db).await?))
    }

    /// Sets the member's status, returns `Ok(None)` when the member does not exist
    pub async fn set_status(
        &self,
        id: i32,
        status: MemberStatus,
    ) -> Result<Option<entity::member::Model>, DbErr> {
        self.update(
            id,
            UpdateMemberDto {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    /// Stores the LINE display name last seen for a member
    pub async fn set_line_display_name(
        &self,
        member: entity::member::Model,
        display_name: &str,
    ) -> Result<entity::member::Model, DbErr> {
        let mut member = member.into_active_model();
        member.line_display_name = ActiveValue::Set(Some(display_name.to_string()));
        member.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        member.update(self.db).await
    }

    pub async fn count_by_status(&self, status: MemberStatus) -> Result<u64, DbErr> {
        entity::prelude::Member::find()
            .filter(entity::member::Column::Status.eq(status))
            .count(self.db)
            .await
    }

    /// Number of active members linked to a LINE account
    pub async fn count_line_linked(&self) -> Result<u64, DbErr> {
        entity::prelude::Member::find()
            .filter(entity::member::Column::Status.eq(MemberStatus::Active))
            .filter(entity::member::Column::LineUserId.is_not_null())
            .count(self.db)
            .await
    }

    pub async fn count_all(&self) -> Result<u64, DbErr> {
        entity::prelude::Member::find().count(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use entity::sea_orm_active_enums::{MemberRole, MemberStatus};
    use lionsclub_test_utils::prelude::*;

    use crate::{
        model::member::CreateMemberDto,
        server::data::member::{MemberFilter, MemberRepository},
    };

    fn new_member(name: &str, line_user_id: Option<&str>) -> CreateMemberDto {
        CreateMemberDto {
            name: name.to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            phone: None,
            line_user_id: line_user_id.map(str::to_string),
            role: None,
            joined_on: None,
        }
    }

    mod create {
        use super::*;

        /// Expect defaults for role, status and joined date
        #[tokio::test]
        async fn creates_active_member_with_defaults() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Member)?;
            let repo = MemberRepository::new(&test.db);

            let member = repo.create(new_member("Jane", Some("U1"))).await?;

            assert_eq!(member.role, MemberRole::Member);
            assert_eq!(member.status, MemberStatus::Active);
            assert!(member.joined_on.is_some());

            Ok(())
        }

        /// Expect explicit joined date to be kept
        #[tokio::test]
        async fn keeps_given_joined_date() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Member)?;
            let repo = MemberRepository::new(&test.db);
            let joined_on = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();

            let member = repo
                .create(CreateMemberDto {
                    joined_on: Some(joined_on),
                    ..new_member("Jane", None)
                })
                .await?;

            assert_eq!(member.joined_on, Some(joined_on));

            Ok(())
        }

        /// Expect error when LINE user ID is already linked
        #[tokio::test]
        async fn fails_for_duplicate_line_user_id() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Member)?;
            let repo = MemberRepository::new(&test.db);

            repo.create(new_member("Jane", Some("U1"))).await?;
            let result = repo.create(new_member("John", Some("U1"))).await;

            assert!(result.is_err());

            Ok(())
        }

        /// Expect error when the member table doesn't exist
        #[tokio::test]
        async fn fails_without_table() -> Result<(), TestError> {
            let test = test_setup_with_tables!()?;
            let repo = MemberRepository::new(&test.db);

            let result = repo.create(new_member("Jane", None)).await;

            assert!(result.is_err());

            Ok(())
        }
    }

    mod list {
        use super::*;

        /// Expect filters and pagination to apply and total to count all matches
        #[tokio::test]
        async fn filters_and_paginates() -> Result<(), TestError> {
            let mut test = TestBuilder::new()
                .with_table(entity::prelude::Member)
                .with_member(MemberFixture::new("Alice", None))
                .with_member(MemberFixture::new("Bob", None).role(MemberRole::Officer))
                .with_member(MemberFixture::new("Carol", None).status(MemberStatus::Inactive))
                .build()
                .await?;
            test.member().insert_member("Alina", None).await?;
            let repo = MemberRepository::new(&test.db);

            let (active, total) = repo
                .list(
                    &MemberFilter {
                        status: Some(MemberStatus::Active),
                        ..Default::default()
                    },
                    1,
                    2,
                )
                .await?;
            assert_eq!(total, 3);
            assert_eq!(active.len(), 2);
            assert_eq!(active[0].name, "Alice");

            let (matching, total) = repo
                .list(
                    &MemberFilter {
                        q: Some("Ali".to_string()),
                        ..Default::default()
                    },
                    1,
                    20,
                )
                .await?;
            assert_eq!(total, 2);
            assert_eq!(matching.len(), 2);

            let (officers, _) = repo
                .list(
                    &MemberFilter {
                        role: Some(MemberRole::Officer),
                        ..Default::default()
                    },
                    1,
                    20,
                )
                .await?;
            assert_eq!(officers.len(), 1);
            assert_eq!(officers[0].name, "Bob");

            Ok(())
        }
    }

    mod find_line_recipients {
        use super::*;

        /// Expect only active, LINE-linked members within the given roles
        #[tokio::test]
        async fn returns_active_linked_members() -> Result<(), TestError> {
            let test = TestBuilder::new()
                .with_table(entity::prelude::Member)
                .with_member(MemberFixture::new("Alice", Some("U1")))
                .with_member(MemberFixture::new("Bob", None))
                .with_member(
                    MemberFixture::new("Carol", Some("U3")).status(MemberStatus::Suspended),
                )
                .with_member(MemberFixture::new("Dave", Some("U4")).role(MemberRole::President))
                .build()
                .await?;
            let repo = MemberRepository::new(&test.db);

            let everyone = repo.find_line_recipients(None).await?;
            assert_eq!(everyone.len(), 2);

            let roles = MemberRole::Director.and_above();
            let leaders = repo.find_line_recipients(Some(&roles)).await?;
            assert_eq!(leaders.len(), 1);
            assert_eq!(leaders[0].name, "Dave");

            Ok(())
        }
    }

    mod update {
        use super::*;
        use crate::model::member::UpdateMemberDto;

        /// Expect only provided fields to change
        #[tokio::test]
        async fn applies_partial_changes() -> Result<(), TestError> {
            let mut test = test_setup_with_tables!(entity::prelude::Member)?;
            let member = test.member().insert_member("Jane", Some("U1")).await?;
            let repo = MemberRepository::new(&test.db);

            let updated = repo
                .update(
                    member.id,
                    UpdateMemberDto {
                        phone: Some("0912345678".to_string()),
                        ..Default::default()
                    },
                )
                .await?
                .unwrap();

            assert_eq!(updated.name, "Jane");
            assert_eq!(updated.phone.as_deref(), Some("0912345678"));
            assert_eq!(updated.line_user_id.as_deref(), Some("U1"));

            Ok(())
        }

        /// Expect None for a member that doesn't exist
        #[tokio::test]
        async fn returns_none_for_missing_member() -> Result<(), TestError> {
            let test = test_setup_with_tables!(entity::prelude::Member)?;
            let repo = MemberRepository::new(&test.db);

            let result = repo.set_status(42, MemberStatus::Inactive).await?;

            assert!(result.is_none());

            Ok(())
        }
    }
}
