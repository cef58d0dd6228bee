//! SQLite-backed credential store
//!
//! Owns the `users` table. Passwords are stored as bcrypt hashes (per-record
//! random salt, configurable work factor); the plaintext never touches disk
//! or the logs. Username uniqueness is enforced by the storage-level UNIQUE
//! constraint, so concurrent registrations cannot race past it.

use crate::auth::models::{Identity, User};
use crate::error::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Fixed input for the decoy hash computed at startup; see `verify`.
const DUMMY_PASSWORD: &str = "wicket-decoy-password";

/// Credential store handle. Cheap to clone; all clones share one connection.
#[derive(Clone)]
pub struct CredentialStore {
    conn: Arc<Mutex<Connection>>,
    cost: u32,
    dummy_hash: String,
}

impl CredentialStore {
    /// Open (or create) the credential database at the given path.
    pub fn open(path: &Path, cost: u32) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads + crash safety
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
        )?;

        // Hashed once up front so lookups for unknown users can burn the
        // same bcrypt work as a real verification.
        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            cost,
            dummy_hash,
        })
    }

    /// Register a user. Duplicate registrations are idempotent no-ops: the
    /// first stored credential wins and the row is never overwritten.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        let store = self.clone();
        let username = username.to_string();
        let password = password.to_string();
        spawn_blocking(move || store.register_blocking(&username, &password)).await
    }

    /// Verify a login attempt. Unknown users and wrong passwords fail with
    /// the same `InvalidCredentials` value so callers cannot enumerate
    /// usernames.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Identity> {
        let store = self.clone();
        let username = username.to_string();
        let password = password.to_string();
        spawn_blocking(move || store.verify_blocking(&username, &password)).await
    }

    /// Look up a stored user row by username.
    pub async fn find_user(&self, username: &str) -> Result<Option<User>> {
        let store = self.clone();
        let username = username.to_string();
        spawn_blocking(move || store.find_user_blocking(&username)).await
    }

    /// Total number of stored credential rows.
    pub async fn user_count(&self) -> Result<u64> {
        let store = self.clone();
        spawn_blocking(move || {
            let conn = store.lock()?;
            let count: u64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
    }

    fn register_blocking(&self, username: &str, password: &str) -> Result<()> {
        // bcrypt before taking the lock; hashing dominates the call
        let password_hash = bcrypt::hash(password, self.cost)?;
        let created_at = chrono::Utc::now().to_rfc3339();

        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT INTO users (username, password_hash, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(username) DO NOTHING",
            params![username, password_hash, created_at],
        )?;

        if inserted > 0 {
            tracing::info!(username, "Registered user");
        } else {
            tracing::debug!(username, "Duplicate registration ignored");
        }
        Ok(())
    }

    fn verify_blocking(&self, username: &str, password: &str) -> Result<Identity> {
        let stored: Option<String> = {
            let conn = self.lock()?;
            conn.query_row(
                "SELECT password_hash FROM users WHERE username = ?1",
                params![username],
                |row| row.get(0),
            )
            .optional()?
        };

        match stored {
            Some(hash) => {
                if bcrypt::verify(password, &hash)? {
                    Ok(Identity::new(username))
                } else {
                    Err(Error::InvalidCredentials)
                }
            }
            None => {
                // Burn a verification against the decoy hash so an unknown
                // username costs the same as a wrong password.
                let _ = bcrypt::verify(password, &self.dummy_hash);
                Err(Error::InvalidCredentials)
            }
        }
    }

    fn find_user_blocking(&self, username: &str) -> Result<Option<User>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, username, password_hash, created_at)| {
            let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| Error::Other(format!("Corrupt created_at timestamp: {}", e)))?
                .with_timezone(&chrono::Utc);
            Ok(User {
                id,
                username,
                password_hash,
                created_at,
            })
        })
        .transpose()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Other("Credential store mutex poisoned".to_string()))
    }
}

/// Run a store operation on the blocking pool; bcrypt and SQLite are both
/// synchronous.
async fn spawn_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Other(format!("Blocking task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the test suite fast
    const TEST_COST: u32 = 4;

    fn open_test_store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store =
            CredentialStore::open(&dir.path().join("users.db"), TEST_COST).expect("Failed to open");
        (dir, store)
    }

    #[tokio::test]
    async fn test_register_and_verify() {
        let (_dir, store) = open_test_store();
        store.register("alice", "wonderland").await.unwrap();

        let identity = store.verify("alice", "wonderland").await.unwrap();
        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let (_dir, store) = open_test_store();
        store.register("alice", "wonderland").await.unwrap();

        let result = store.verify("alice", "not-wonderland").await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user_indistinguishable_from_wrong_password() {
        let (_dir, store) = open_test_store();
        store.register("alice", "wonderland").await.unwrap();

        let unknown = store.verify("bob", "wonderland").await;
        let wrong = store.verify("alice", "oops").await;
        assert!(matches!(unknown, Err(Error::InvalidCredentials)));
        assert!(matches!(wrong, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_noop() {
        let (_dir, store) = open_test_store();
        store.register("alice", "wonderland").await.unwrap();
        store.register("alice", "different-password").await.unwrap();

        assert_eq!(store.user_count().await.unwrap(), 1);
        // First credential wins
        assert!(store.verify("alice", "wonderland").await.is_ok());
        assert!(store.verify("alice", "different-password").await.is_err());
    }

    #[tokio::test]
    async fn test_stored_row_holds_hash_not_plaintext() {
        let (_dir, store) = open_test_store();
        store.register("alice", "wonderland").await.unwrap();

        let user = store.find_user("alice").await.unwrap().expect("Row exists");
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "wonderland");
        assert!(user.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_hashes_are_salted_per_record() {
        let (_dir, store) = open_test_store();
        store.register("alice", "shared-password").await.unwrap();
        store.register("bob", "shared-password").await.unwrap();

        let alice = store.find_user("alice").await.unwrap().unwrap();
        let bob = store.find_user("bob").await.unwrap().unwrap();
        assert_ne!(alice.password_hash, bob.password_hash);
    }
}
