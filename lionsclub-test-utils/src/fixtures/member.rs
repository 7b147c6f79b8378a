//! Member fixtures.

use chrono::Utc;
use entity::sea_orm_active_enums::{MemberRole, MemberStatus};
use sea_orm::{ActiveModelTrait, ActiveValue};

use crate::{error::TestError, TestContext};

impl TestContext {
    pub fn member<'a>(&'a mut self) -> MemberFixtures<'a> {
        MemberFixtures { setup: self }
    }
}

pub struct MemberFixtures<'a> {
    setup: &'a mut TestContext,
}

/// Description of a member to insert, queued by [`TestBuilder::with_member`](crate::TestBuilder::with_member).
#[derive(Clone, Debug)]
pub struct MemberFixture {
    pub name: String,
    pub line_user_id: Option<String>,
    pub role: MemberRole,
    pub status: MemberStatus,
}

impl MemberFixture {
    /// Active member with the `member` role.
    pub fn new(name: &str, line_user_id: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            line_user_id: line_user_id.map(str::to_string),
            role: MemberRole::Member,
            status: MemberStatus::Active,
        }
    }

    pub fn role(mut self, role: MemberRole) -> Self {
        self.role = role;
        self
    }

    pub fn status(mut self, status: MemberStatus) -> Self {
        self.status = status;
        self
    }
}

impl<'a> MemberFixtures<'a> {
    /// Insert an active member with the `member` role.
    ///
    /// # Arguments
    /// - `name` - Member name
    /// - `line_user_id` - Linked LINE user ID, if any
    ///
    /// # Returns
    /// - `Ok(entity::member::Model)` - The inserted member
    /// - `Err(TestError::DbErr)` - Insert failed
    pub async fn insert_member(
        &self,
        name: &str,
        line_user_id: Option<&str>,
    ) -> Result<entity::member::Model, TestError> {
        self.insert(MemberFixture::new(name, line_user_id)).await
    }

    /// Insert a member described by a [`MemberFixture`].
    pub async fn insert(&self, fixture: MemberFixture) -> Result<entity::member::Model, TestError> {
        let now = Utc::now().naive_utc();

        let member = entity::member::ActiveModel {
            name: ActiveValue::Set(fixture.name),
            email: ActiveValue::Set(None),
            phone: ActiveValue::Set(None),
            line_user_id: ActiveValue::Set(fixture.line_user_id),
            line_display_name: ActiveValue::Set(None),
            role: ActiveValue::Set(fixture.role),
            status: ActiveValue::Set(fixture.status),
            joined_on: ActiveValue::Set(Some(now.date())),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(member.insert(&self.setup.db).await?)
    }
}
