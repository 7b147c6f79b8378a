//! Test context returned by [`TestBuilder::build`](crate::TestBuilder::build).

use std::sync::Arc;

use mockito::{Mock, Server, ServerGuard};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, StatementBuilder};
use tower_sessions::{MemoryStore, Session};

use crate::error::TestError;

/// Test environment for a single test.
///
/// Holds an in-memory SQLite database, a session backed by a `MemoryStore`, and a
/// mockito server standing in for the LINE Messaging API.
///
/// ```ignore
/// let mut test = TestBuilder::new().with_core_tables().build().await?;
///
/// let member = test.member().insert_member("Jane", Some("U1")).await?;
/// let client_url = test.line_api_url();
///
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// Database connection to in-memory SQLite database
    pub db: DatabaseConnection,
    /// Session used for admin authentication flows
    pub session: Session,

    /// Mock HTTP server for LINE Messaging API endpoints
    pub server: ServerGuard,
    /// Collection of mock HTTP endpoints for assertion
    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    /// Create a new test context with an empty database.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Initialized test context
    /// - `Err(TestError::DbErr)` - Database connection failed
    pub(crate) async fn new() -> Result<Self, TestError> {
        let server = Server::new_async().await;

        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestContext {
            db,
            session,
            server,
            mocks: Vec::new(),
        })
    }

    /// Base URL of the mock LINE Messaging API, used in place of `https://api.line.me`.
    pub fn line_api_url(&self) -> String {
        self.server.url()
    }

    /// Execute schema statements (tables and indexes) in order.
    pub(crate) async fn with_statements<S: StatementBuilder>(
        &self,
        stmts: Vec<S>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Register a mock created after `build()` so [`assert_mocks`](Self::assert_mocks) covers it.
    pub fn track_mock(&mut self, mock: Mock) {
        self.mocks.push(mock);
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
