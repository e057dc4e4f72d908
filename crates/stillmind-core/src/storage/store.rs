//! SQLite-based session log.
//!
//! Provides persistent storage for:
//! - The append-only session history
//! - A key-value store for application state (parked runner)
//!
//! JSON import/export uses the same camelCase record shape the session
//! model serializes to, so exported files stay compatible with previously
//! persisted history.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use crate::error::{Result, StorageError};
use crate::session::{AudioSettings, EndType, SessionRecord};

use super::data_dir;

const INSERT_SQL: &str = "INSERT INTO sessions
    (id, timestamp, duration_min, completed, end_type, actual_duration_secs, audio_nature, audio_music)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const INSERT_OR_IGNORE_SQL: &str = "INSERT OR IGNORE INTO sessions
    (id, timestamp, duration_min, completed, end_type, actual_duration_secs, audio_nature, audio_music)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// SQLite store for the session log.
///
/// History is append-only; records load most-recent-first.
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Open the store at `~/.config/stillmind/stillmind.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the store cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("stillmind.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        tracing::debug!(path = %path.display(), "session store opened");
        Ok(store)
    }

    /// Open an in-memory store (tests and ephemeral use).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    id                   TEXT PRIMARY KEY,
                    timestamp            INTEGER NOT NULL,
                    duration_min         INTEGER NOT NULL,
                    completed            INTEGER NOT NULL,
                    end_type             TEXT,
                    actual_duration_secs INTEGER,
                    audio_nature         INTEGER NOT NULL DEFAULT 0,
                    audio_music          INTEGER NOT NULL DEFAULT 0
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_timestamp ON sessions(timestamp);",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    /// Append one record to the log.
    ///
    /// # Errors
    /// Returns `DuplicateId` if a record with the same id exists; ids are
    /// never reused.
    pub fn append_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        match self.insert_row(record, INSERT_SQL) {
            Ok(_) => {
                tracing::debug!(id = %record.id, completed = record.completed, "session appended");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::DuplicateId(record.id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load the full history, most-recent-first.
    ///
    /// Timestamp ties resolve to the later insert first.
    pub fn load_sessions(&self) -> Result<Vec<SessionRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, duration_min, completed, end_type, actual_duration_secs,
                    audio_nature, audio_music
             FROM sessions
             ORDER BY timestamp DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SessionRecord {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                duration: row.get(2)?,
                completed: row.get(3)?,
                end_type: row
                    .get::<_, Option<String>>(4)?
                    .as_deref()
                    .and_then(end_type_from_str),
                actual_duration_seconds: row.get(5)?,
                audio_settings: AudioSettings {
                    nature: row.get(6)?,
                    music: row.get(7)?,
                },
            })
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    /// Delete all records, returning how many were removed.
    pub fn clear_sessions(&self) -> Result<usize, StorageError> {
        let deleted = self.conn.execute("DELETE FROM sessions", [])?;
        tracing::info!(deleted, "session history cleared");
        Ok(deleted)
    }

    /// Serialize the full history as a pretty-printed JSON array.
    pub fn export_json(&self) -> Result<String> {
        let sessions = self.load_sessions()?;
        tracing::info!(count = sessions.len(), "history exported");
        Ok(serde_json::to_string_pretty(&sessions)?)
    }

    /// Insert records parsed from a JSON array, skipping ids already present.
    ///
    /// Returns the number of newly inserted records.
    ///
    /// # Errors
    /// Returns an error if the JSON does not parse as a record array.
    pub fn import_json(&self, json: &str) -> Result<usize> {
        let records: Vec<SessionRecord> = serde_json::from_str(json)?;
        let mut inserted = 0;
        for record in &records {
            inserted += self
                .insert_row(record, INSERT_OR_IGNORE_SQL)
                .map_err(StorageError::from)?;
        }
        tracing::info!(total = records.len(), inserted, "history imported");
        Ok(inserted)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn insert_row(&self, record: &SessionRecord, sql: &str) -> Result<usize, rusqlite::Error> {
        self.conn.execute(
            sql,
            params![
                record.id,
                record.timestamp,
                record.duration,
                record.completed,
                record.end_type.map(end_type_to_str),
                record.actual_duration_seconds,
                record.audio_settings.nature,
                record.audio_settings.music,
            ],
        )
    }
}

fn end_type_to_str(end_type: EndType) -> &'static str {
    match end_type {
        EndType::Completed => "completed",
        EndType::GaveUp => "gave_up",
        EndType::Cancelled => "cancelled",
    }
}

fn end_type_from_str(s: &str) -> Option<EndType> {
    match s {
        "completed" => Some(EndType::Completed),
        "gave_up" => Some(EndType::GaveUp),
        "cancelled" => Some(EndType::Cancelled),
        _ => None,
    }
}
