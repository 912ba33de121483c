//! Identity provider port - who is signed in

use crate::domain::result::Result;
use crate::domain::{Credentials, User};

/// Authentication collaborator
///
/// The team store only ever needs `current_user`. Login and logout change
/// what it returns; callers rebind the store afterwards.
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials and make the user current
    fn login(&self, credentials: &Credentials) -> Result<User>;

    /// Clear the current user. Idempotent
    fn logout(&self) -> Result<()>;

    /// The signed-in user, if any
    fn current_user(&self) -> Result<Option<User>>;
}
