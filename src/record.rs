use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::app_dirs::AppDirs;

/// Key under which the best-ever final score is stored
pub const BEST_RECORD_KEY: &str = "best_record";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("record storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no state directory available for the record database")]
    NoStateDir,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Integer key-value persistence that outlives the process
pub trait RecordStore {
    fn get_int(&self, key: &str, default: i64) -> Result<i64>;
    fn put_int(&mut self, key: &str, value: i64) -> Result<()>;
}

/// Outcome of comparing a final score with the previous best
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    pub updated_record: u32,
    pub is_new_record: bool,
}

/// Pure comparison; only a strictly higher score sets a new record.
pub fn reconcile(final_score: u32, previous_record: u32) -> RecordOutcome {
    let is_new_record = final_score > previous_record;
    RecordOutcome {
        updated_record: if is_new_record {
            final_score
        } else {
            previous_record
        },
        is_new_record,
    }
}

/// Reads the stored best, reconciles `final_score` against it and writes back on a new record
pub fn settle_round<R: RecordStore + ?Sized>(
    store: &mut R,
    final_score: u32,
) -> Result<RecordOutcome> {
    let stored = store.get_int(BEST_RECORD_KEY, 0)?;
    // anything out of range in storage is treated as no record
    let previous = u32::try_from(stored).unwrap_or(0);
    let outcome = reconcile(final_score, previous);

    if outcome.is_new_record {
        store.put_int(BEST_RECORD_KEY, i64::from(outcome.updated_record))?;
        tracing::info!(
            previous,
            record = outcome.updated_record,
            "new best-ever record"
        );
    }

    Ok(outcome)
}

#[derive(Debug, Default, Clone)]
pub struct MemoryRecordStore {
    values: HashMap<String, i64>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get_int(&self, key: &str, default: i64) -> Result<i64> {
        Ok(self.values.get(key).copied().unwrap_or(default))
    }

    fn put_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Sqlite-backed store living under the app state directory
#[derive(Debug)]
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Opens (creating if needed) the database at the default location
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().ok_or(StoreError::NoStateDir)?;
        Self::open(db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!(path = %path.display(), "opening record database");
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteRecordStore {
    fn get_int(&self, key: &str, default: i64) -> Result<i64> {
        let value: Option<i64> = self
            .conn
            .query_row("SELECT value FROM records WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value.unwrap_or(default))
    }

    fn put_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO records (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
