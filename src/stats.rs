use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;
use crate::error::StoreError;

/// Key under which the whole error-count mapping is stored.
pub const ERROR_COUNTS_KEY: &str = "errorCounts";

/// Per-word mistake counts, keyed by the shown side of the pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCounts(BTreeMap<String, u32>);

impl ErrorCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> u32 {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Record one more mistake for `key` and return the new count.
    pub fn increment(&mut self, key: &str) -> u32 {
        let count = self.0.entry(key.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Fold `other` in, keeping the higher count for each key.
    pub fn merge_max(&mut self, other: ErrorCounts) {
        for (key, count) in other.0 {
            let entry = self.0.entry(key).or_insert(0);
            *entry = (*entry).max(count);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u32)> for ErrorCounts {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Durable home of the error counts.
pub trait ErrorCountStore: Send {
    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<ErrorCounts>, StoreError>;
    fn save(&self, counts: &ErrorCounts) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;

    /// Load the counts, treating a missing or unreadable value as empty.
    fn load_or_default(&self) -> ErrorCounts {
        match self.load() {
            Ok(counts) => counts.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "could not load error counts, starting empty");
                ErrorCounts::default()
            }
        }
    }
}

/// SQLite backed key-value store
#[derive(Debug)]
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    /// Open the database at the default state location, creating it if needed.
    pub fn new() -> Result<Self, StoreError> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("vokab.db"));
        Self::open(db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %path.display(), "opening stats database");
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        Ok(StatsDb { conn })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

impl ErrorCountStore for StatsDb {
    fn load(&self) -> Result<Option<ErrorCounts>, StoreError> {
        match self.get(ERROR_COUNTS_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, counts: &ErrorCounts) -> Result<(), StoreError> {
        let raw = serde_json::to_string(counts)?;
        self.set(ERROR_COUNTS_KEY, &raw)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.remove(ERROR_COUNTS_KEY)
    }
}

/// In-process store. Clones share the same underlying mapping.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Option<ErrorCounts>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counts(counts: ErrorCounts) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(counts))),
        }
    }

    /// What was last saved, if anything.
    pub fn snapshot(&self) -> Option<ErrorCounts> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ErrorCountStore for MemoryStore {
    fn load(&self) -> Result<Option<ErrorCounts>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, counts: &ErrorCounts) -> Result<(), StoreError> {
        *self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(counts.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}
