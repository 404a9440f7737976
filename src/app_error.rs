use std::fmt::{Display, Formatter};

use redb::{
    CommitError, DatabaseError, Error as RedbError, StorageError, TableError, TransactionError,
};
use serde_json::Error as SerdeError;

/// Failure taxonomy for the catalog store.
///
/// Read-path corruption ([`StoreError::Corrupt`]) is recovered internally
/// and logged, never returned to callers of the list operations. Every
/// write-path failure surfaces through one of the remaining variants.
#[derive(Debug)]
pub enum StoreError {
    /// Candidate record failed required-field validation during
    /// save, update, or restore.
    Validation(String),
    /// An update referenced an identifier that is not in the collection.
    NotFound(String),
    /// Stored content was unparseable or not an array.
    Corrupt(String),
    /// A backup restore could not complete its write phase.
    Restore(String),
    /// The underlying storage engine failed.
    Database(String),
    /// JSON encoding or decoding failed outside the corruption path.
    Serialization(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Validation(msg) => write!(f, "Validation error: {}", msg),
            StoreError::NotFound(msg) => write!(f, "Not found: {}", msg),
            StoreError::Corrupt(msg) => write!(f, "Corrupt storage: {}", msg),
            StoreError::Restore(msg) => write!(f, "Restore error: {}", msg),
            StoreError::Database(msg) => write!(f, "Database error: {}", msg),
            StoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<RedbError> for StoreError {
    fn from(err: RedbError) -> Self {
        match err {
            RedbError::TableDoesNotExist(name) =>
                StoreError::NotFound(format!("Table '{}' not found", name)),
            RedbError::Corrupted(msg) =>
                StoreError::Database(format!("Database is corrupted: {}", msg)),
            RedbError::Io(io_err) =>
                StoreError::Database(format!("IO error: {}", io_err)),
            _ => StoreError::Database(format!("Database error: {:?}", err)),
        }
    }
}

impl From<SerdeError> for StoreError {
    fn from(err: SerdeError) -> Self {
        StoreError::Serialization(format!("JSON serialization error: {}", err))
    }
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        StoreError::Database(format!("Database open error: {:?}", err))
    }
}

impl From<TransactionError> for StoreError {
    fn from(err: TransactionError) -> Self {
        StoreError::Database(format!("Transaction error: {:?}", err))
    }
}

impl From<TableError> for StoreError {
    fn from(err: TableError) -> Self {
        StoreError::Database(format!("Table operation error: {:?}", err))
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::Database(format!("Storage error: {:?}", err))
    }
}

impl From<CommitError> for StoreError {
    fn from(err: CommitError) -> Self {
        StoreError::Database(format!("Commit error: {:?}", err))
    }
}
