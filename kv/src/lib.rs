//! Key-value store backing the enrollment database.
//!
//! The engine only needs per-user get / upsert / delete with atomic
//! per-key semantics; concurrent writers for the same key resolve
//! last-writer-wins. [`MemoryStore`] serves tests, [`RedbStore`]
//! persistence.

pub mod memory;
pub mod redb;

use thiserror::Error;

/// Errors that can occur in store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("kv: storage error: {0}")]
    Storage(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value store with string keys and opaque byte values.
///
/// Each operation is atomic for its key; no cross-key transactions.
pub trait KVStore: Send + Sync {
    /// Returns the value for a key, or `None` when absent.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Inserts or replaces the value for a key.
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Removes a key. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> StoreResult<()>;
}

pub use memory::MemoryStore;
pub use redb::RedbStore;
