use openssl::{memcmp, sha::sha256};
use tower_sessions::Session;

use crate::server::{error::auth::AuthError, error::Error, model::session::admin::SessionAdmin};

/// Compares two secrets in constant time
///
/// Both values are hashed first so inputs of different length are compared
/// without leaking their length.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    memcmp::eq(&sha256(provided.as_bytes()), &sha256(expected.as_bytes()))
}

pub struct AuthService<'a> {
    admin_password: &'a str,
}

impl<'a> AuthService<'a> {
    /// Creates a new instance of [`AuthService`]
    pub fn new(admin_password: &'a str) -> Self {
        Self { admin_password }
    }

    /// Verifies the admin password and marks the session as admin
    ///
    /// The session ID is cycled on success to prevent session fixation.
    ///
    /// # Returns
    /// - `Ok(())` - Session is now authenticated
    /// - `Err(Error::AuthError(AuthError::InvalidCredentials))` - Wrong password
    pub async fn login(&self, session: &Session, password: &str) -> Result<(), Error> {
        if !secrets_match(password, self.admin_password) {
            return Err(AuthError::InvalidCredentials.into());
        }

        session.cycle_id().await?;
        SessionAdmin::insert(session).await?;

        tracing::info!("Admin logged in");

        Ok(())
    }

    /// Clears the session
    pub async fn logout(&self, session: &Session) -> Result<(), Error> {
        session.flush().await?;

        Ok(())
    }
}
