//! Session service - keeps the team store bound to whoever is signed in

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::domain::{Credentials, User};
use crate::ports::IdentityProvider;
use crate::services::TeamStore;

pub struct SessionService {
    identity: Arc<dyn IdentityProvider>,
    store: TeamStore,
}

impl SessionService {
    /// Wrap `store` and bind it to the provider's current user
    pub fn new(identity: Arc<dyn IdentityProvider>, store: TeamStore) -> Result<Self> {
        let mut session = Self { identity, store };
        let current = session
            .identity
            .current_user()
            .context("Failed to read current session")?;
        session.rebind(current);
        Ok(session)
    }

    pub fn login(&mut self, credentials: &Credentials) -> Result<User> {
        let user = self.identity.login(credentials).context("Login failed")?;
        self.rebind(Some(user.clone()));
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.identity.logout().context("Logout failed")?;
        self.rebind(None);
        Ok(())
    }

    /// Re-read the current user and rebind if it changed
    ///
    /// Returns true when the store switched to a different owner.
    pub fn sync(&mut self) -> Result<bool> {
        let current = self
            .identity
            .current_user()
            .context("Failed to read current session")?;
        if current.as_ref() == self.store.owner() {
            return Ok(false);
        }
        self.rebind(current);
        Ok(true)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.store.owner()
    }

    pub fn store(&self) -> &TeamStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TeamStore {
        &mut self.store
    }

    /// Mutable store access, but only while someone is signed in
    pub fn require_store(&mut self) -> Result<&mut TeamStore> {
        if self.store.owner().is_none() {
            anyhow::bail!("Not signed in. Run 'pt login' first.");
        }
        Ok(&mut self.store)
    }

    fn rebind(&mut self, user: Option<User>) {
        self.store.bind(user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySlotStore;
    use crate::domain::result::Error;
    use crate::ports::SlotStore;
    use std::sync::Mutex;

    /// Accepts any password equal to the username
    #[derive(Default)]
    struct FakeIdentity {
        current: Mutex<Option<User>>,
    }

    impl IdentityProvider for FakeIdentity {
        fn login(&self, credentials: &Credentials) -> crate::domain::result::Result<User> {
            if credentials.password != credentials.username {
                return Err(Error::auth("Invalid username or password"));
            }
            let user = User::new(format!("id-{}", credentials.username), &credentials.username);
            *self.current.lock().unwrap() = Some(user.clone());
            Ok(user)
        }

        fn logout(&self) -> crate::domain::result::Result<()> {
            *self.current.lock().unwrap() = None;
            Ok(())
        }

        fn current_user(&self) -> crate::domain::result::Result<Option<User>> {
            Ok(self.current.lock().unwrap().clone())
        }
    }

    fn session() -> (Arc<FakeIdentity>, Arc<InMemorySlotStore>, SessionService) {
        let identity = Arc::new(FakeIdentity::default());
        let slots = Arc::new(InMemorySlotStore::new());
        let session =
            SessionService::new(identity.clone(), TeamStore::new(slots.clone())).unwrap();
        (identity, slots, session)
    }

    #[test]
    fn test_starts_signed_out() {
        let (_, _, mut session) = session();
        assert!(session.current_user().is_none());
        assert!(session.require_store().is_err());
    }

    #[test]
    fn test_login_binds_store() {
        let (_, slots, mut session) = session();
        session.login(&Credentials::new("misty", "misty")).unwrap();
        assert_eq!(session.current_user().unwrap().username, "misty");

        session.require_store().unwrap().create_team("Water");
        assert!(slots.get("teams_id-misty").unwrap().is_some());
    }

    #[test]
    fn test_failed_login_keeps_binding() {
        let (_, _, mut session) = session();
        session.login(&Credentials::new("misty", "misty")).unwrap();
        assert!(session.login(&Credentials::new("brock", "wrong")).is_err());
        assert_eq!(session.current_user().unwrap().username, "misty");
    }

    #[test]
    fn test_logout_clears_teams() {
        let (_, _, mut session) = session();
        session.login(&Credentials::new("misty", "misty")).unwrap();
        session.store_mut().create_team("Water");
        session.logout().unwrap();
        assert!(session.current_user().is_none());
        assert!(session.store().teams().is_empty());
    }

    #[test]
    fn test_switching_users_swaps_collections() {
        let (_, _, mut session) = session();
        session.login(&Credentials::new("misty", "misty")).unwrap();
        session.store_mut().create_team("Water");

        session.login(&Credentials::new("brock", "brock")).unwrap();
        assert!(session.store().teams().is_empty());

        session.login(&Credentials::new("misty", "misty")).unwrap();
        assert_eq!(session.store().teams()[0].name, "Water");
    }

    #[test]
    fn test_sync_picks_up_external_change() {
        let (identity, _, mut session) = session();
        assert!(!session.sync().unwrap());

        identity.login(&Credentials::new("misty", "misty")).unwrap();
        assert!(session.sync().unwrap());
        assert_eq!(session.current_user().unwrap().username, "misty");
        assert!(!session.sync().unwrap());

        identity.logout().unwrap();
        assert!(session.sync().unwrap());
        assert!(session.current_user().is_none());
    }
}
