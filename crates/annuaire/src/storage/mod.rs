//! Storage layer for annuaire.
//!
//! The directory persists itself as text blobs under fixed keys. This module
//! defines that contract (`KeyValueStore`) and provides a `SQLite`-backed
//! implementation for real use and an in-memory one for tests.

pub mod migrations;
pub mod schema;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};

/// Key holding the serialized list of people.
pub const PEOPLE_KEY: &str = "annuaire-people";

/// Key holding the last stored people value that could not be fully read.
pub const PEOPLE_BACKUP_KEY: &str = "annuaire-people-backup";

/// Key holding the one-shot "onboarding presentation viewed" flag.
pub const PRESENTATION_SEEN_KEY: &str = "annuaire-presentation-seen";

/// A synchronous string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns `true` if a value was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&mut self, key: &str) -> Result<bool>;
}

/// Key-value store kept in a single `SQLite` file.
#[derive(Debug)]
pub struct SqliteStore {
    path: PathBuf,
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `path`, creating it and its parent directories
    /// when missing, and migrate it to the current schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created, or the
    /// schema cannot be migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent(&path)?;

        debug!("Opening {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::OpenDatabase {
            path: path.clone(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;

        Self::ready(path, conn)
    }

    /// A private database that disappears when dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        let path = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory().map_err(|source| Error::OpenDatabase {
            path: path.clone(),
            source,
        })?;
        Self::ready(path, conn)
    }

    fn ready(path: PathBuf, conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)?;
        debug!("Database ready at {}", path.display());
        Ok(Self { path, conn })
    }

    /// File backing this store, `:memory:` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored key, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM entries ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(schema::UPSERT_ENTRY, params![key, value])?;
        debug!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM entries WHERE key = ?1", [key])?;
        Ok(affected > 0)
    }
}

/// In-memory key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("failed to create test store")
    }

    #[test]
    fn test_open_in_memory() {
        let store = create_test_store();
        assert_eq!(store.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_get_missing_key() {
        let store = create_test_store();
        assert_eq!(store.get(PEOPLE_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut store = create_test_store();
        store.set(PEOPLE_KEY, "[]").unwrap();
        assert_eq!(store.get(PEOPLE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = create_test_store();
        store.set(PEOPLE_KEY, "first").unwrap();
        store.set(PEOPLE_KEY, "second").unwrap();

        assert_eq!(store.get(PEOPLE_KEY).unwrap().as_deref(), Some("second"));
        assert_eq!(store.keys().unwrap(), vec![PEOPLE_KEY.to_string()]);
    }

    #[test]
    fn test_remove() {
        let mut store = create_test_store();
        store.set(PRESENTATION_SEEN_KEY, "true").unwrap();

        assert!(store.remove(PRESENTATION_SEEN_KEY).unwrap());
        assert!(!store.remove(PRESENTATION_SEEN_KEY).unwrap());
        assert_eq!(store.get(PRESENTATION_SEEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_unicode_value() {
        let mut store = create_test_store();
        let value = r#"[{"name":"Hélène Dupré","job":"Développeuse"}]"#;
        store.set(PEOPLE_KEY, value).unwrap();
        assert_eq!(store.get(PEOPLE_KEY).unwrap().as_deref(), Some(value));
    }

    #[test]
    fn test_open_file_based_persists() {
        let db_path =
            std::env::temp_dir().join(format!("annuaire_store_test_{}.db", std::process::id()));

        {
            let mut store = SqliteStore::open(&db_path).unwrap();
            store.set(PEOPLE_KEY, "[1,2,3]").unwrap();
            assert_eq!(store.path(), db_path);
        }

        let store = SqliteStore::open(&db_path).unwrap();
        assert_eq!(store.get(PEOPLE_KEY).unwrap().as_deref(), Some("[1,2,3]"));

        drop(store);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let root = std::env::temp_dir().join(format!("annuaire_test_{}", std::process::id()));
        let nested_path = root.join("nested").join("annuaire.db");
        let _ = std::fs::remove_dir_all(&root);

        let store = SqliteStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(store);
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        assert!(store.remove("k").unwrap());
        assert_eq!(store.get("k").unwrap(), None);
    }
}
