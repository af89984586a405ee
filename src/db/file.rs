// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed durable store.
//!
//! All entries live in a single JSON object on disk. Every mutation
//! rewrites the file through a temporary sibling and a rename, so a crash
//! leaves either the old or the new contents.

use crate::db::store::{KvStore, StoreError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Durable store persisted to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty store. A file that exists but is not
    /// a JSON object of strings is an error: silently starting empty would
    /// overwrite it on the next write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }

        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
                key: path.display().to_string(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        tracing::info!(path = %path.display(), keys = entries.len(), "Opened data file");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Io("store lock poisoned".to_string()))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let contents =
            serde_json::to_string_pretty(entries).map_err(|e| StoreError::Serialize(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, contents).map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    /// Memory only changes once the new contents are on disk.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
