use super::{AuthError, MSG_NOT_ADMIN};
use crate::store::User;

/// Allow only admins. Call after [`super::resolve`] succeeded.
///
/// # Errors
/// Returns [`AuthError::Forbidden`] for non-admin users.
pub fn require_admin(user: &User) -> Result<(), AuthError> {
    if user.admin {
        Ok(())
    } else {
        Err(AuthError::Forbidden(MSG_NOT_ADMIN))
    }
}
