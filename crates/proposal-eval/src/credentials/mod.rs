//! Scorer credential storage.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// Keyed credential storage with upsert semantics.
pub trait CredentialStore: Send + Sync {
    fn get(&self, service_id: &str) -> Result<Option<String>, CredentialStoreError>;
    fn set(&self, service_id: &str, credential: &str) -> Result<(), CredentialStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("credential cannot be empty")]
    EmptyCredential,
    #[error("credential storage failed: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("credential store lock poisoned")]
    Poisoned,
}

/// SQLite-backed store. A single connection behind one mutex serializes every
/// read and write.
pub struct SqliteCredentialStore {
    conn: Mutex<Connection>,
}

impl SqliteCredentialStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CredentialStoreError> {
        Self::initialize(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, CredentialStoreError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self, CredentialStoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS api_keys (
                id INTEGER PRIMARY KEY,
                service TEXT UNIQUE,
                api_key TEXT
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn get(&self, service_id: &str) -> Result<Option<String>, CredentialStoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| CredentialStoreError::Poisoned)?;
        let credential = conn
            .query_row(
                "SELECT api_key FROM api_keys WHERE service = ?1",
                params![service_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(credential)
    }

    fn set(&self, service_id: &str, credential: &str) -> Result<(), CredentialStoreError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(CredentialStoreError::EmptyCredential);
        }

        let conn = self
            .conn
            .lock()
            .map_err(|_| CredentialStoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO api_keys (service, api_key) VALUES (?1, ?2)
             ON CONFLICT(service) DO UPDATE SET api_key = excluded.api_key",
            params![service_id, credential],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_none_for_unknown_service() {
        let store = SqliteCredentialStore::open_in_memory().expect("store opens");
        assert_eq!(store.get("nonexistent_service").expect("lookup"), None);
    }

    #[test]
    fn saves_and_reads_back_credential() {
        let store = SqliteCredentialStore::open_in_memory().expect("store opens");
        store.set("test_service", "test_key_123").expect("saved");
        assert_eq!(
            store.get("test_service").expect("lookup"),
            Some("test_key_123".to_string())
        );
    }

    #[test]
    fn set_overwrites_existing_credential() {
        let store = SqliteCredentialStore::open_in_memory().expect("store opens");
        store.set("google_gemini", "first").expect("saved");
        store.set("google_gemini", "  second  ").expect("updated");
        assert_eq!(
            store.get("google_gemini").expect("lookup"),
            Some("second".to_string())
        );
    }

    #[test]
    fn rejects_blank_credential() {
        let store = SqliteCredentialStore::open_in_memory().expect("store opens");
        let err = store.set("google_gemini", "   ").expect_err("blank rejected");
        assert!(matches!(err, CredentialStoreError::EmptyCredential));
        assert_eq!(store.get("google_gemini").expect("lookup"), None);
    }
}
