//! Local filesystem cache tier.
//!
//! One file per key, `<cache_dir>/<key>`, holding the exact serialized
//! bytes of the stored value. The file is a durability backstop for a
//! single process: whatever the remote loses can be restored from here.
//! Only the owning store writes these files, and only under its key lock.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hookslot_core::{CacheError, StorageKey};

/// Outcome of a local cache read.
///
/// A missing file and an unreadable file are separate tiers: both fall
/// through to regeneration in the store, but they are logged differently.
/// Whether the bytes parse is the caller's decision; only it knows the
/// expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalRead {
    Value(Vec<u8>),
    Missing,
    Unreadable { reason: String },
}

/// Filesystem-backed cache of raw payloads, one file per key.
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the cache files live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cache file for a key.
    pub fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.dir.join(key.as_str())
    }

    /// Read the raw payload cached for a key.
    pub async fn read(&self, key: &StorageKey) -> LocalRead {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => LocalRead::Value(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => LocalRead::Missing,
            Err(err) => LocalRead::Unreadable {
                reason: err.to_string(),
            },
        }
    }

    /// Overwrite the cache file for a key, creating the directory on demand.
    pub async fn write(&self, key: &StorageKey, payload: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(key);
        if let Err(err) = tokio::fs::create_dir_all(&self.dir).await {
            return Err(CacheError::WriteFailed {
                path: path.display().to_string(),
                reason: err.to_string(),
            });
        }
        tokio::fs::write(&path, payload)
            .await
            .map_err(|err| CacheError::WriteFailed {
                path: path.display().to_string(),
                reason: err.to_string(),
            })
    }
}
