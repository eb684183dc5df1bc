//! Storage backends for the per-user layout row
//!
//! # Table
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `layouts` | `user_id` | JSON-serialized `LayoutRow` | One layout row per user |
//!
//! Exactly one row per user: `upsert` is last-write-wins. redb commits are
//! durable as soon as `commit()` returns, which matters on till hardware
//! that gets powered off without warning. redb operations themselves are
//! synchronous; the async seam exists so callers never block the
//! interaction flow on storage.

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Table for per-user layouts: key = user_id, value = JSON-serialized LayoutRow
const LAYOUTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("layouts");

/// The raw persisted shape: untyped sections JSON plus the table counter.
/// The codec is the only place that turns `sections` into typed entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutRow {
    pub sections: serde_json::Value,
    pub table_counter: u64,
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Async seam over the durable layout store
#[async_trait]
pub trait LayoutBackend: Send + Sync {
    /// Fetch the single layout row for a user; `None` for first-time users
    async fn fetch(&self, user_id: &str) -> StorageResult<Option<LayoutRow>>;

    /// Upsert the single layout row for a user (last-write-wins)
    async fn upsert(&self, user_id: &str, row: LayoutRow) -> StorageResult<()>;
}

/// redb-backed layout storage
#[derive(Clone)]
pub struct RedbLayoutBackend {
    db: Arc<Database>,
}

impl RedbLayoutBackend {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(LAYOUTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn read_row(&self, user_id: &str) -> StorageResult<Option<LayoutRow>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(LAYOUTS_TABLE)?;
        let Some(guard) = table.get(user_id)? else {
            return Ok(None);
        };
        let row: LayoutRow = serde_json::from_slice(guard.value())?;
        Ok(Some(row))
    }

    fn write_row(&self, user_id: &str, row: &LayoutRow) -> StorageResult<()> {
        let bytes = serde_json::to_vec(row)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(LAYOUTS_TABLE)?;
            table.insert(user_id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[async_trait]
impl LayoutBackend for RedbLayoutBackend {
    async fn fetch(&self, user_id: &str) -> StorageResult<Option<LayoutRow>> {
        self.read_row(user_id)
    }

    async fn upsert(&self, user_id: &str, row: LayoutRow) -> StorageResult<()> {
        self.write_row(user_id, &row)
    }
}

/// In-memory backend for tests, with fault injection
#[derive(Default)]
pub struct MemoryLayoutBackend {
    rows: parking_lot::Mutex<HashMap<String, LayoutRow>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryLayoutBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `fetch` calls fail with `Unavailable`
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `upsert` calls fail with `Unavailable`
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed a raw row directly (for malformed-payload tests)
    pub fn put_raw(&self, user_id: &str, row: LayoutRow) {
        self.rows.lock().insert(user_id.to_string(), row);
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

#[async_trait]
impl LayoutBackend for MemoryLayoutBackend {
    async fn fetch(&self, user_id: &str) -> StorageResult<Option<LayoutRow>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected read fault".to_string()));
        }
        Ok(self.rows.lock().get(user_id).cloned())
    }

    async fn upsert(&self, user_id: &str, row: LayoutRow) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "injected write fault".to_string(),
            ));
        }
        self.rows.lock().insert(user_id.to_string(), row);
        Ok(())
    }
}
