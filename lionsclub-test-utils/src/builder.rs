//! Declarative test builder.
//!
//! Configuration methods queue work which is executed in order by `build()`:
//! tables and indexes first, then fixtures, then mock endpoints.

use mockito::Mock;
use sea_orm::{
    sea_query::{Index, IndexCreateStatement, TableCreateStatement},
    DbBackend, EntityTrait, Schema,
};

use crate::{error::TestError, fixtures::member::MemberFixture, TestContext};

/// Builder for declarative test initialization.
///
/// ```no_run
/// use lionsclub_test_utils::{fixtures::member::MemberFixture, TestBuilder};
///
/// # async fn example() -> Result<(), lionsclub_test_utils::TestError> {
/// let test = TestBuilder::new()
///     .with_core_tables()
///     .with_member(MemberFixture::new("Jane Chen", Some("U1234")))
///     .with_event("Monthly dinner", Some(20))
///     .with_reply_endpoint(1)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    indexes: Vec<IndexCreateStatement>,

    members: Vec<MemberFixture>,
    events: Vec<(String, Option<i32>)>, // (title, capacity)

    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,
    reply_endpoints: Vec<usize>,
    multicast_endpoints: Vec<(usize, usize)>, // (status, expected_requests)
    profile_endpoints: Vec<(String, String, usize)>, // (user_id, display_name, expected_requests)
}

impl TestBuilder {
    /// Create a new TestBuilder with nothing configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            indexes: Vec::new(),
            members: Vec::new(),
            events: Vec::new(),
            mock_builders: Vec::new(),
            reply_endpoints: Vec::new(),
            multicast_endpoints: Vec::new(),
            profile_endpoints: Vec::new(),
        }
    }

    /// Add the member, event, registration and check-in tables.
    ///
    /// Also creates the unique `(member_id, event_id)` indexes on registrations and
    /// check-ins, which entity-derived schemas don't carry.
    pub fn with_core_tables(self) -> Self {
        self.with_table(entity::prelude::Member)
            .with_table(entity::prelude::Event)
            .with_table(entity::prelude::Registration)
            .with_table(entity::prelude::Checkin)
    }

    /// Add every table of the application.
    pub fn with_all_tables(self) -> Self {
        self.with_core_tables()
            .with_table(entity::prelude::Payment)
            .with_table(entity::prelude::Announcement)
            .with_table(entity::prelude::MessageLog)
            .with_table(entity::prelude::PushTemplate)
            .with_table(entity::prelude::PushRecord)
            .with_table(entity::prelude::File)
    }

    /// Add a single entity table to the test database.
    ///
    /// # Arguments
    /// - `entity` - Entity type implementing `EntityTrait`
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(DbBackend::Sqlite);
        let table_name = entity.table_name().to_string();
        self.tables.push(schema.create_table_from_entity(entity));

        if table_name == "registration" || table_name == "checkin" {
            self.indexes.push(
                Index::create()
                    .name(format!("idx-{}-member_id-event_id", table_name))
                    .table(sea_orm::sea_query::Alias::new(&table_name))
                    .col(sea_orm::sea_query::Alias::new("member_id"))
                    .col(sea_orm::sea_query::Alias::new("event_id"))
                    .unique()
                    .to_owned(),
            );
        }

        self
    }

    /// Insert a member during `build()`.
    pub fn with_member(mut self, member: MemberFixture) -> Self {
        self.members.push(member);
        self
    }

    /// Insert an upcoming event during `build()`.
    ///
    /// # Arguments
    /// - `title` - Event title
    /// - `capacity` - Maximum attendees, `None` for unlimited
    pub fn with_event(mut self, title: &str, capacity: Option<i32>) -> Self {
        self.events.push((title.to_string(), capacity));
        self
    }

    /// Mock the LINE reply endpoint, expecting `expected_requests` calls.
    pub fn with_reply_endpoint(mut self, expected_requests: usize) -> Self {
        self.reply_endpoints.push(expected_requests);
        self
    }

    /// Mock the LINE multicast endpoint answering with `status`.
    pub fn with_multicast_endpoint(mut self, status: usize, expected_requests: usize) -> Self {
        self.multicast_endpoints.push((status, expected_requests));
        self
    }

    /// Mock the LINE profile endpoint for a user.
    pub fn with_profile_endpoint(
        mut self,
        user_id: &str,
        display_name: &str,
        expected_requests: usize,
    ) -> Self {
        self.profile_endpoints.push((
            user_id.to_string(),
            display_name.to_string(),
            expected_requests,
        ));
        self
    }

    /// Add a custom mock endpoint with full control over the mockito server.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Build the test context by creating all configured tables, fixtures, and mock endpoints.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully configured test environment
    /// - `Err(TestError::DbErr)` - Table creation or fixture insertion failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        // 1. Schema
        setup.with_statements(self.tables).await?;
        setup.with_statements(self.indexes).await?;

        // 2. Fixtures
        for member in self.members {
            setup.member().insert(member).await?;
        }

        for (title, capacity) in self.events {
            setup.event().insert_event(&title, capacity).await?;
        }

        // 3. Mock endpoints, custom ones first so sequential matching on the same path works
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for expected in self.reply_endpoints {
            mocks.push(setup.line().create_reply_endpoint(expected));
        }

        for (status, expected) in self.multicast_endpoints {
            mocks.push(setup.line().create_multicast_endpoint(status, expected));
        }

        for (user_id, display_name, expected) in self.profile_endpoints {
            mocks.push(
                setup
                    .line()
                    .create_profile_endpoint(&user_id, &display_name, expected),
            );
        }

        setup.mocks = mocks;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
