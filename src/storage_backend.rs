//! Storage backends for the catalog store.
//!
//! The store never touches a database directly; it goes through the
//! [`StorageBackend`] trait, a string-keyed get/set/remove surface. The
//! durable implementation is [`RedbStorage`], a single-table redb
//! database where every `set` is one committed transaction.
//! [`MemoryStorage`] is the in-memory stand-in used by tests.

use std::collections::HashMap;
use std::path::Path;

use log::info;
use redb::{Database, ReadableTable, TableDefinition, TableError};

use crate::app_error::StoreError;

const TABLE: TableDefinition<&str, &str> = TableDefinition::new("catalog");

/// String-keyed key-value storage, the only thing the store requires of
/// its persistence layer.
///
/// Each value is an opaque string; the store keeps JSON-encoded arrays
/// in them. A `set` must be atomic: readers see either the previous
/// value or the new one, never a partial write.
pub trait StorageBackend {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key` in a single atomic step, replacing
    /// any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key` entirely. Removing an absent key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Durable backend over a single-table redb database file.
pub struct RedbStorage {
    db: Database,
}

impl RedbStorage {
    /// Opens the database at `path`, creating the file if it does not
    /// exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let db = Database::create(path)?;
        info!("Catalog storage opened at {}", path.display());
        Ok(Self { db })
    }
}

impl StorageBackend for RedbStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(TABLE) {
            Ok(table) => table,
            // A fresh database has no table until the first write.
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = table.get(key)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TABLE)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TABLE)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }
}

/// In-memory backend backed by a plain `HashMap`.
///
/// Useful as a test fake and for callers that want the validation and
/// self-healing behavior without touching disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
