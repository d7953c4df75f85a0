//! In-memory store for tests and ephemeral deployments.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{KVStore, StoreError, StoreResult};

/// An in-memory key-value store backed by a HashMap.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KVStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let data = self
            .data
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut data = self
            .data
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        data.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let mut data = self
            .data
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_operations() {
        let store = MemoryStore::new();

        store.set("alice", b"record-1").unwrap();
        assert_eq!(store.get("alice").unwrap(), Some(b"record-1".to_vec()));
        assert_eq!(store.get("bob").unwrap(), None);

        store.delete("alice").unwrap();
        assert_eq!(store.get("alice").unwrap(), None);
    }

    #[test]
    fn set_replaces_existing_value() {
        let store = MemoryStore::new();

        store.set("alice", b"first").unwrap();
        store.set("alice", b"second").unwrap();
        assert_eq!(store.get("alice").unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn delete_absent_key_is_ok() {
        let store = MemoryStore::new();
        store.delete("ghost").unwrap();
    }
}
