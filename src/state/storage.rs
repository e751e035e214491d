//! Storage capability.
//!
//! A string-keyed get/set/remove contract with two backends: an in-memory
//! map (shared between clones, with a switch to simulate a full store) and a
//! directory holding one JSON file per key.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use walkdir::WalkDir;

use crate::error::{Result, ScenegenError};

/// Extension for file-backed records.
const RECORD_EXTENSION: &str = "json";

/// External key-value store.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    reject_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail, as a full browser store would.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock(None)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    fn lock(&self, key: Option<&str>) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| ScenegenError::StorageRead {
            key: key.unwrap_or_default().to_string(),
            reason: "memory store lock poisoned".to_string(),
        })
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock(Some(key))?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(ScenegenError::StorageWrite {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.lock(Some(key))?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock(Some(key))?.remove(key);
        Ok(())
    }
}

/// Directory-backed store: `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ScenegenError::StorageRead {
                key: key.to_string(),
                reason: "keys may only contain ASCII letters, digits, '-' and '_'".to_string(),
            });
        }
        Ok(self.root.join(format!("{}.{}", key, RECORD_EXTENSION)))
    }

    /// Keys currently present, sorted.
    pub fn keys(&self) -> Vec<String> {
        if !self.root.exists() {
            return Vec::new();
        }

        let mut keys: Vec<String> = WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry.path().extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION)
            })
            .filter_map(|entry| {
                entry
                    .path()
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .collect();
        keys.sort();
        keys
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| ScenegenError::StorageRead {
                key: key.to_string(),
                reason: format!("{}: {}", path.display(), e),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(key)?;
        let write_error = |e: std::io::Error| ScenegenError::StorageWrite {
            key: key.to_string(),
            reason: e.to_string(),
        };

        fs::create_dir_all(&self.root).map_err(write_error)?;

        // write-then-rename so a crash never leaves half a record
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).map_err(write_error)?;
        fs::rename(&tmp_path, &path).map_err(write_error)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.record_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ScenegenError::StorageWrite {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
