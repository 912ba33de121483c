//! Local identity provider
//!
//! Accounts live in the `sys_users` table with Argon2id password hashes
//! stored as PHC strings.
//! The signed-in user is remembered in `session.json` next to the database
//! so consecutive CLI invocations share one session.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use uuid::Uuid;

use super::duckdb::{DuckDbStore, UserRecord};
use crate::domain::result::{Error, Result};
use crate::domain::{Credentials, User};
use crate::ports::IdentityProvider;

const SESSION_FILE: &str = "session.json";

/// Argon2id cost parameters for password hashing
#[derive(Debug, Clone, Copy)]
pub struct PasswordParams {
    pub time_cost: u32,
    /// KiB
    pub memory_cost: u32,
    pub parallelism: u32,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            time_cost: 2,
            memory_cost: 19456, // 19 MiB
            parallelism: 1,
        }
    }
}

/// Identity provider backed by local accounts
pub struct LocalIdentityProvider {
    store: Arc<DuckDbStore>,
    session_path: PathBuf,
    params: PasswordParams,
}

impl LocalIdentityProvider {
    pub fn new(store: Arc<DuckDbStore>, data_dir: &Path) -> Self {
        Self::with_params(store, data_dir, PasswordParams::default())
    }

    pub fn with_params(store: Arc<DuckDbStore>, data_dir: &Path, params: PasswordParams) -> Self {
        Self {
            store,
            session_path: data_dir.join(SESSION_FILE),
            params,
        }
    }

    /// Create a new account and sign it in
    pub fn register(&self, credentials: &Credentials) -> Result<User> {
        let username = normalize_username(&credentials.username)?;
        if credentials.password.len() < 6 {
            return Err(Error::validation("Password must be at least 6 characters"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2()?
            .hash_password(credentials.password.as_bytes(), &salt)
            .map_err(|e| Error::Other(format!("Failed to hash password: {}", e)))?
            .to_string();

        let record = UserRecord {
            user_id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            created_at: String::new(),
        };
        self.store.insert_user(&record)?;

        let user = User::new(record.user_id, record.username);
        self.write_session(&user)?;
        Ok(user)
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            None,
        )
        .map_err(|e| Error::Other(format!("Failed to create argon2 params: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Cost parameters are read back from the stored PHC string
    fn verify(&self, record: &UserRecord, password: &str) -> Result<bool> {
        let parsed = PasswordHash::new(&record.password_hash)
            .map_err(|e| Error::database(format!("Corrupt password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn write_session(&self, user: &User) -> Result<()> {
        let dir = self
            .session_path
            .parent()
            .ok_or_else(|| Error::Config("Session path has no parent directory".into()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(user)?.as_bytes())?;
        tmp.persist(&self.session_path)
            .map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn login(&self, credentials: &Credentials) -> Result<User> {
        let username = normalize_username(&credentials.username)?;
        let invalid = || Error::auth("Invalid username or password");

        let record = self
            .store
            .get_user_by_username(&username)?
            .ok_or_else(invalid)?;
        if !self.verify(&record, &credentials.password)? {
            return Err(invalid());
        }

        let user = User::new(record.user_id, record.username);
        self.write_session(&user)?;
        Ok(user)
    }

    fn logout(&self) -> Result<()> {
        match std::fs::remove_file(&self.session_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn current_user(&self) -> Result<Option<User>> {
        if !self.session_path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.session_path)?;
        // A damaged session file means nobody is signed in
        Ok(serde_json::from_str(&content).ok())
    }
}

fn normalize_username(raw: &str) -> Result<String> {
    let username = raw.trim().to_lowercase();
    if username.is_empty() {
        return Err(Error::validation("Username cannot be empty"));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(Error::validation(
            "Username may only contain letters, digits, '.', '_' and '-'",
        ));
    }
    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Cheap parameters so tests don't spend seconds hashing
    fn fast_params() -> PasswordParams {
        PasswordParams {
            time_cost: 1,
            memory_cost: 256,
            parallelism: 1,
        }
    }

    fn provider(dir: &TempDir) -> LocalIdentityProvider {
        let store = DuckDbStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        LocalIdentityProvider::with_params(Arc::new(store), dir.path(), fast_params())
    }

    #[test]
    fn test_register_signs_in() {
        let dir = TempDir::new().unwrap();
        let identity = provider(&dir);

        let user = identity.register(&Credentials::new("Ash", "pikachu")).unwrap();
        assert_eq!(user.username, "ash");
        assert_eq!(identity.current_user().unwrap(), Some(user));
        assert!(identity.session_path().exists());
    }

    #[test]
    fn test_login_and_logout() {
        let dir = TempDir::new().unwrap();
        let identity = provider(&dir);
        let registered = identity.register(&Credentials::new("misty", "starmie")).unwrap();
        identity.logout().unwrap();
        assert_eq!(identity.current_user().unwrap(), None);

        let user = identity.login(&Credentials::new(" MISTY ", "starmie")).unwrap();
        assert_eq!(user, registered);
        assert_eq!(identity.current_user().unwrap(), Some(user));

        identity.logout().unwrap();
        identity.logout().unwrap();
        assert_eq!(identity.current_user().unwrap(), None);
    }

    #[test]
    fn test_wrong_password_fails() {
        let dir = TempDir::new().unwrap();
        let identity = provider(&dir);
        identity.register(&Credentials::new("brock", "onix-rock")).unwrap();
        identity.logout().unwrap();

        let err = identity.login(&Credentials::new("brock", "geodude")).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert_eq!(identity.current_user().unwrap(), None);

        let err = identity.login(&Credentials::new("nobody", "whatever")).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[test]
    fn test_register_validation() {
        let dir = TempDir::new().unwrap();
        let identity = provider(&dir);

        assert!(matches!(
            identity.register(&Credentials::new("  ", "longenough")),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            identity.register(&Credentials::new("gary", "123")),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            identity.register(&Credentials::new("ga ry", "longenough")),
            Err(Error::Validation(_))
        ));

        identity.register(&Credentials::new("gary", "eevee-line")).unwrap();
        assert!(matches!(
            identity.register(&Credentials::new("Gary", "another-one")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_corrupt_session_means_signed_out() {
        let dir = TempDir::new().unwrap();
        let identity = provider(&dir);
        std::fs::write(identity.session_path(), "{not json").unwrap();
        assert_eq!(identity.current_user().unwrap(), None);
    }

    #[test]
    fn test_hash_stored_as_phc_string() {
        let dir = TempDir::new().unwrap();
        let store = DuckDbStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        let store = Arc::new(store);
        let identity = LocalIdentityProvider::with_params(store.clone(), dir.path(), fast_params());

        identity.register(&Credentials::new("erika", "gloom-gloom")).unwrap();
        identity.register(&Credentials::new("sabrina", "gloom-gloom")).unwrap();

        let erika = store.get_user_by_username("erika").unwrap().unwrap();
        let sabrina = store.get_user_by_username("sabrina").unwrap().unwrap();
        assert!(erika.password_hash.starts_with("$argon2id$"));
        assert!(!erika.password_hash.contains("gloom"));
        // Fresh salt per account
        assert_ne!(erika.password_hash, sabrina.password_hash);
    }

    #[test]
    fn test_corrupt_stored_hash_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = DuckDbStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store
            .insert_user(&UserRecord {
                user_id: "u-1".into(),
                username: "koga".into(),
                password_hash: "not-a-phc-string".into(),
                created_at: String::new(),
            })
            .unwrap();
        let identity =
            LocalIdentityProvider::with_params(Arc::new(store), dir.path(), fast_params());

        let err = identity.login(&Credentials::new("koga", "whatever")).unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }
}
