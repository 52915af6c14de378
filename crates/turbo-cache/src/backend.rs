//! Storage backends for the cache.

use crate::CacheError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

/// Raw byte-oriented Key-Value store.
///
/// Implementations must be safe to share between threads; the cache holds
/// its backend behind an `Arc`.
pub trait KvBackend: Send + Sync {
    /// Get the bytes stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store bytes under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;
}

/// In-process store. Contents live as long as the backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> CacheError {
    CacheError::StoreError("memory store lock poisoned".to_string())
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Directory-backed store, one file per key.
///
/// Keys are escaped into portable file names, so namespaced keys such as
/// `@TurboCommerce:cart` are safe on every platform. Writes go to a
/// temporary file first and are renamed into place.
///
/// All calls block on the filesystem; async callers should run them on a
/// blocking thread.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

const ENTRY_EXTENSION: &str = "kv";

impl FileBackend {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            CacheError::OpenError(format!("{}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_key(key), ENTRY_EXTENSION))
    }
}

impl KvBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.entry_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::trace!(key, bytes = value.len(), "wrote store entry");
        Ok(())
    }
}

/// Escape a key into `[A-Za-z0-9_-]`, writing other bytes as `%XX`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}
