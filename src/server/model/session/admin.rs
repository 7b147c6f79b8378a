use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

pub const SESSION_ADMIN_KEY: &str = "lionsclub:admin";

/// Marker stored in the session once the admin password has been verified.
#[derive(Default, Deserialize, Serialize, Debug)]
pub struct SessionAdmin(pub bool);

impl SessionAdmin {
    /// Mark the session as authenticated admin
    pub async fn insert(session: &Session) -> Result<(), Error> {
        session.insert(SESSION_ADMIN_KEY, SessionAdmin(true)).await?;

        Ok(())
    }

    /// Whether the session belongs to an authenticated admin
    pub async fn is_admin(session: &Session) -> Result<bool, Error> {
        Ok(session
            .get::<SessionAdmin>(SESSION_ADMIN_KEY)
            .await?
            .map(|SessionAdmin(admin)| admin)
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    mod insert {
        use lionsclub_test_utils::prelude::*;

        use crate::server::model::session::admin::SessionAdmin;

        /// Expect session to report admin after insert
        #[tokio::test]
        async fn marks_session_as_admin() -> Result<(), TestError> {
            let test = test_setup_with_tables!()?;

            SessionAdmin::insert(&test.session).await.unwrap();
            let is_admin = SessionAdmin::is_admin(&test.session).await.unwrap();

            assert!(is_admin);

            Ok(())
        }
    }

    mod is_admin {
        use lionsclub_test_utils::prelude::*;

        use crate::server::model::session::admin::{SessionAdmin, SESSION_ADMIN_KEY};

        /// Expect false for a fresh session
        #[tokio::test]
        async fn returns_false_without_login() -> Result<(), TestError> {
            let test = test_setup_with_tables!()?;

            let is_admin = SessionAdmin::is_admin(&test.session).await.unwrap();

            assert!(!is_admin);

            Ok(())
        }

        /// Expect false when the stored flag is explicitly false
        #[tokio::test]
        async fn returns_false_for_revoked_flag() -> Result<(), TestError> {
            let test = test_setup_with_tables!()?;
            test.session
                .insert(SESSION_ADMIN_KEY, SessionAdmin(false))
                .await?;

            let is_admin = SessionAdmin::is_admin(&test.session).await.unwrap();

            assert!(!is_admin);

            Ok(())
        }
    }
}
