use tower_sessions::Session;

use crate::server::{
    error::{auth::AuthError, Error},
    model::session::admin::SessionAdmin,
};

/// Ensures the session belongs to an authenticated admin
///
/// # Returns
/// - `Ok(())` - Admin session present
/// - `Err(Error::AuthError(AuthError::NotAuthenticated))` - No admin session, maps to 401
/// - `Err(Error::SessionError)` - Session store failure
pub async fn require_admin(session: &Session) -> Result<(), Error> {
    if !SessionAdmin::is_admin(session).await? {
        return Err(AuthError::NotAuthenticated.into());
    }

    Ok(())
}
