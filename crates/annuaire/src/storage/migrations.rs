//! Schema versioning for the `SQLite` store.
//!
//! The version lives in the `metadata` table. On open, every step of
//! [`MIGRATIONS`] above the stored version is applied in its own transaction.
//! A database written by a newer build is refused rather than downgraded.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use super::schema::{CREATE_ENTRIES_TABLE, CREATE_METADATA_TABLE};
use crate::error::{Error, Result};

/// A numbered batch of schema statements.
#[derive(Debug)]
pub struct Migration {
    /// Version reached once the statements have run.
    pub version: u32,
    /// Statements, executed in order.
    pub statements: &'static [&'static str],
}

/// Every step from an empty database to the current schema, ascending.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    statements: &[CREATE_ENTRIES_TABLE],
}];

const VERSION_KEY: &str = "schema_version";

/// Version of the newest step in [`MIGRATIONS`].
#[must_use]
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Bring `conn` up to [`latest_version`].
///
/// # Errors
///
/// Returns an error if the stored version is unreadable or newer than this
/// build, or if a statement fails.
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_METADATA_TABLE)?;

    let stored = stored_version(conn)?;
    let latest = latest_version();
    if stored > latest {
        return Err(Error::Schema(format!(
            "database is at version {stored}, this build supports up to {latest}"
        )));
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > stored) {
        debug!("Applying schema version {}", migration.version);
        let tx = conn.unchecked_transaction()?;
        for statement in migration.statements {
            tx.execute_batch(statement)?;
        }
        tx.execute(
            "INSERT INTO metadata (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (VERSION_KEY, migration.version.to_string()),
        )?;
        tx.commit()?;
    }

    Ok(())
}

/// Version recorded in `metadata`, 0 for a fresh database.
fn stored_version(conn: &Connection) -> Result<u32> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        None => Ok(0),
        Some(value) => value
            .parse()
            .map_err(|_| Error::Schema(format!("unreadable schema version {value:?}"))),
    }
}
