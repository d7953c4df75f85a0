//! Redb-based persistent store.

use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::{KVStore, StoreError, StoreResult};

const ENROLLMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("enrollments");

/// A persistent key-value store backed by redb.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Opens or creates a redb store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = Database::create(path).map_err(|e| StoreError::Storage(e.to_string()))?;

        // Create the table up front so first reads do not fail.
        let tx = db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let _ = tx
                .open_table(ENROLLMENTS)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(Self { db })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = tx
            .open_table(ENROLLMENTS)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        match table
            .get(key)
            .map_err(|e| StoreError::Storage(e.to_string()))?
        {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(ENROLLMENTS)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let tx = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(ENROLLMENTS)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn redb_basic() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("enroll.redb")).unwrap();

        store.set("alice", b"record").unwrap();
        assert_eq!(store.get("alice").unwrap(), Some(b"record".to_vec()));

        store.delete("alice").unwrap();
        assert_eq!(store.get("alice").unwrap(), None);
    }

    #[test]
    fn redb_upsert_replaces() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("enroll.redb")).unwrap();

        store.set("alice", b"first").unwrap();
        store.set("alice", b"second").unwrap();
        assert_eq!(store.get("alice").unwrap(), Some(b"second".to_vec()));
    }
}
