// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value store abstraction with typed JSON helpers.
//!
//! Values are stored as raw strings so that a corrupted entry can be read
//! back, detected, and discarded by the caller instead of failing inside
//! the store.

use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// Shared store handle passed to services.
pub type Store = Arc<dyn KvStore>;

/// Durable string key-value store.
///
/// Writes are last-write-wins. Callers do read-modify-write without any
/// optimistic concurrency check.
pub trait KvStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed JSON access on top of any [`KvStore`].
pub trait KvStoreExt {
    /// Read and deserialize the value under `key`.
    ///
    /// Returns [`StoreError::Corrupt`] if a value exists but does not parse.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>;

    /// Serialize and store `value` under `key`.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>;
}

impl<S: KvStore + ?Sized> KvStoreExt for S {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.set(key, raw)
    }
}

/// In-memory store, used for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in a shared [`Store`] handle.
    pub fn shared(self) -> Store {
        Arc::new(self)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Failed to serialize value: {0}")]
    Serialize(String),

    #[error("Stored value under '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_json_round_trip() {
        let store = MemoryStore::new();
        let sample = Sample {
            name: "wall balls".to_string(),
            count: 100,
        };

        store.set_json("sample", &sample).unwrap();
        let loaded: Option<Sample> = store.get_json("sample").unwrap();

        assert_eq!(loaded, Some(sample));
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        let loaded: Option<Sample> = store.get_json("nope").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_unparseable_value_is_corrupt() {
        let store = MemoryStore::new();
        store.set("sample", "{not json".to_string()).unwrap();

        let result: Result<Option<Sample>, _> = store.get_json("sample");
        match result {
            Err(StoreError::Corrupt { key, .. }) => assert_eq!(key, "sample"),
            other => panic!("expected corrupt error, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("ghost").is_ok());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();
        handle.set("k", "v".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.len(), 1);
    }
}
