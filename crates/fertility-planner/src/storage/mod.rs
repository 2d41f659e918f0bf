//! SQLite persistence for every patient-scoped record.
//!
//! One [`SqliteStore`] implements each workflow's repository trait. The
//! connection sits behind a mutex and is only ever locked for the duration of
//! a single statement batch, never across an `.await`.

mod care;
mod journey;
mod patients;
mod pathways;
mod recommendations;
mod reviews;
mod timeline;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use tracing::info;

const MIGRATIONS: &[(i64, &str)] = &[
    (1, include_str!("../../migrations/001_initial.sql")),
    (2, include_str!("../../migrations/002_journey_and_reviews.sql")),
    (3, include_str!("../../migrations/003_care_records.sql")),
];

/// Failures raised by any repository backed by the store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored payload could not be encoded or decoded: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("migration {version} failed: {reason}")]
    Migration { version: i64, reason: String },
    #[error("stored timestamp '{0}' is not RFC 3339")]
    Timestamp(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Shared handle over a single SQLite connection.
pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database file and apply pending migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if path.as_os_str() == ":memory:" {
            return Self::open_in_memory();
        }
        let connection = Connection::open(path)?;
        Self::initialise(connection)
    }

    /// In-process database, used by tests and the CLI demos.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let connection = Connection::open_in_memory()?;
        Self::initialise(connection)
    }

    fn initialise(connection: Connection) -> Result<Self, StorageError> {
        connection.execute_batch("PRAGMA foreign_keys=ON;")?;
        run_migrations(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.connection
            .lock()
            .map_err(|_| StorageError::Unavailable("connection lock poisoned".to_string()))
    }

    /// Highest applied migration.
    pub fn schema_version(&self) -> Result<i64, StorageError> {
        let conn = self.connection()?;
        Ok(current_version(&conn))
    }
}

fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let applied = current_version(conn);

    for (version, sql) in MIGRATIONS {
        if *version > applied {
            info!(version, "applying schema migration");
            conn.execute_batch(sql)
                .map_err(|err| StorageError::Migration {
                    version: *version,
                    reason: err.to_string(),
                })?;
        }
    }

    Ok(())
}

fn current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i64>>(0)
    })
    .ok()
    .flatten()
    .unwrap_or(0)
}

/// Fixed-width so lexical order in SQL matches chronological order.
pub(crate) fn encode_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| StorageError::Timestamp(raw.to_string()))
}
