//! DuckDB storage implementation
//!
//! Holds the durable key-value slots (team collections) and the local
//! account table used by the identity provider.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use duckdb::{params, Connection, OptionalExt};

use crate::domain::result::{Error, Result};
use crate::ports::SlotStore;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// Stored local account row
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub username: String,
    /// Argon2id hash in PHC string format (carries its own salt and params)
    pub password_hash: String,
    pub created_at: String,
}

/// DuckDB-backed store
pub struct DuckDbStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbStore {
    /// Open (or create) the database file
    ///
    /// Retries with exponential backoff while another process holds the file
    /// lock, e.g. a second CLI invocation finishing its write.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[poketeams] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// In-memory database, nothing is written to disk
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extension autoloading stays off: the slot tables need nothing beyond core SQL
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    /// Run database migrations, returning what was applied
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn)
            .run_pending()
            .map_err(|e| Error::database(format!("Migration failed: {}", e)))
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Path of the database file (None for in-memory)
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    // === User operations ===

    pub fn insert_user(&self, user: &UserRecord) -> Result<()> {
        let conn = self.lock()?;
        let result = conn.execute(
            "INSERT INTO sys_users (user_id, username, password_hash) VALUES (?, ?, ?)",
            params![user.user_id, user.username, user.password_hash],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().to_lowercase().contains("constraint") => Err(
                Error::validation(format!("Username '{}' is already taken", user.username)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                "SELECT user_id, username, password_hash, CAST(created_at AS VARCHAR)
                 FROM sys_users WHERE username = ?",
                params![username],
                |row| {
                    Ok(UserRecord {
                        user_id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

}

impl SlotStore for DuckDbStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT slot_value FROM sys_slots WHERE slot_key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_slots (slot_key, slot_value, updated_at)
             VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT (slot_key) DO UPDATE SET
                slot_value = EXCLUDED.slot_value,
                updated_at = EXCLUDED.updated_at",
            params![key, value],
        )?;
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn memory_store() -> DuckDbStore {
        let store = DuckDbStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store
    }

    #[test]
    fn test_retryable_error_detection() {
        assert!(is_retryable_error("IO Error: Could not set lock on file \"x.duckdb\""));
        assert!(is_retryable_error("The process cannot access the file because it is being used by another process"));
        assert!(!is_retryable_error("Catalog Error: Table does not exist"));
    }

    #[test]
    fn test_slot_put_get_overwrite() {
        let store = memory_store();
        assert_eq!(store.get("teams_a").unwrap(), None);

        store.put("teams_a", "[]").unwrap();
        assert_eq!(store.get("teams_a").unwrap().as_deref(), Some("[]"));

        store.put("teams_a", "[{\"id\":1}]").unwrap();
        assert_eq!(store.get("teams_a").unwrap().as_deref(), Some("[{\"id\":1}]"));
    }

    #[test]
    fn test_slots_are_independent() {
        let store = memory_store();
        store.put("teams_b", "[2]").unwrap();
        store.put("teams_a", "[1]").unwrap();

        assert_eq!(store.get("teams_a").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.get("teams_b").unwrap().as_deref(), Some("[2]"));
        assert_eq!(store.get("teams_c").unwrap(), None);
    }

    #[test]
    fn test_slots_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.duckdb");
        {
            let store = DuckDbStore::new(&path).unwrap();
            store.ensure_schema().unwrap();
            store.put("teams_u1", "[1,2,3]").unwrap();
        }
        let store = DuckDbStore::new(&path).unwrap();
        store.ensure_schema().unwrap();
        assert_eq!(store.get("teams_u1").unwrap().as_deref(), Some("[1,2,3]"));
        assert_eq!(store.db_path(), Some(path.as_path()));
    }

    #[test]
    fn test_user_insert_and_lookup() {
        let store = memory_store();
        let record = UserRecord {
            user_id: "u-1".to_string(),
            username: "ash".to_string(),
            password_hash: "abcd".to_string(),
            created_at: String::new(),
        };
        store.insert_user(&record).unwrap();

        let found = store.get_user_by_username("ash").unwrap().unwrap();
        assert_eq!(found.user_id, "u-1");
        assert_eq!(found.password_hash, "abcd");
        assert!(!found.created_at.is_empty());
        assert!(store.get_user_by_username("gary").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = memory_store();
        let record = UserRecord {
            user_id: "u-1".to_string(),
            username: "ash".to_string(),
            password_hash: "h".to_string(),
            created_at: String::new(),
        };
        store.insert_user(&record).unwrap();

        let dup = UserRecord {
            user_id: "u-2".to_string(),
            ..record
        };
        let err = store.insert_user(&dup).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
