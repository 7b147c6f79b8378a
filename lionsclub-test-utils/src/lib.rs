//! Shared test scaffolding for the Lions Club backend.
//!
//! Tests declare what they need with [`TestBuilder`] (tables, member and event
//! fixtures, mocked LINE Messaging API endpoints) and receive a [`TestContext`]
//! holding an in-memory SQLite database, a session and the mock server.

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        constant::{
            TEST_ADMIN_PASSWORD, TEST_CHANNEL_ACCESS_TOKEN, TEST_CHANNEL_SECRET, TEST_LIFF_ID,
        },
        fixtures::{line::sign_body, member::MemberFixture},
        test_setup_with_tables, TestBuilder, TestContext, TestError,
    };
}

/// Creates a [`TestContext`] with the listed entity tables and no fixtures.
///
/// ```ignore
/// let test = test_setup_with_tables!(entity::prelude::Member)?;
/// ```
#[macro_export]
macro_rules! test_setup_with_tables {
    () => {{
        $crate::TestBuilder::new().build().await
    }};

    ($($entity:expr),+ $(,)?) => {{
        $crate::TestBuilder::new()
            $(.with_table($entity))+
            .build()
            .await
    }};
}
