//! The keyed byte-storage trait and its in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

/// Errors from the storage layer.
///
/// Entities propagate these without retrying; a failed write surfaces
/// as an operation failure with the record untouched.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend could not serve the request.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored record failed to decode, or its contents contradict
    /// the key it was stored under.
    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

/// Keyed byte storage.
///
/// Implementations must be safe to share across tasks (`Send + Sync`);
/// per-key write serialization is the *entities'* job, so the storage
/// itself only needs individual operations to be atomic.
pub trait Storage: Send + Sync + 'static {
    /// Reads the value under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Writes `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Deletes the value under `key`. Deleting a missing key is fine.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage backed by a mutexed `HashMap`.
///
/// Suitable for tests and single-node deployments. Records vanish with
/// the process, which for an ephemeral relay with a one-hour TTL is an
/// acceptable durability floor.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys. Used by tests and operator surfaces.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("storage mutex poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("storage mutex poisoned".into()))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("storage mutex poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key_returns_none() {
        let store = MemoryStorage::new();
        assert!(store.get("room:nope").unwrap().is_none());
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let store = MemoryStorage::new();
        store.put("k", b"value").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"value"[..]));
    }

    #[test]
    fn test_put_overwrites_previous_value() {
        let store = MemoryStorage::new();
        store.put("k", b"one").unwrap();
        store.put("k", b"two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"two"[..]));
    }

    #[test]
    fn test_delete_removes_key() {
        let store = MemoryStorage::new();
        store.put("k", b"v").unwrap();
        store.delete("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_missing_key_is_ok() {
        let store = MemoryStorage::new();
        store.delete("never-stored").unwrap();
    }
}
