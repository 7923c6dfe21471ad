//! Remote backend seam.
//!
//! The store talks to the remote key-value service through [`RemoteBackend`].
//! The read side distinguishes three outcomes the fallback algorithm treats
//! differently: a value, a genuinely absent key, and an unreachable backend.
//! `InMemoryRemote` is the in-process implementation used by tests and
//! development setups.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use hookslot_core::{RemoteError, StorageKey};

/// Outcome of a successful remote read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRead {
    /// The raw payload stored under the key.
    Value(Vec<u8>),
    /// The backend answered and the key holds nothing.
    Absent,
}

/// Remote key-value backend for raw payloads.
///
/// Connections are stateless per call: no session is carried between
/// operations. Implementations must report a connection-level failure as
/// [`RemoteError::Unreachable`], never as [`RemoteRead::Absent`].
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Read the raw payload for a key.
    async fn get_raw(&self, key: &StorageKey) -> Result<RemoteRead, RemoteError>;

    /// Write the raw payload for a key, overwriting any previous value.
    async fn set_raw(&self, key: &StorageKey, payload: &[u8]) -> Result<(), RemoteError>;
}

/// In-memory remote backend.
///
/// Stands in for the real service in tests and single-process development.
/// The unreachable switch makes every call fail at the connection level,
/// which is how tests drive the store's degraded paths.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    unreachable: AtomicBool,
    writes: AtomicU64,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `RemoteError::Unreachable`.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Seed a key directly, bypassing the trait (test setup).
    pub fn seed(&self, key: &StorageKey, payload: &[u8]) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.as_str().to_string(), payload.to_vec());
        }
    }

    /// Raw payload currently stored under a key, if any (test inspection).
    pub fn snapshot(&self, key: &StorageKey) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key.as_str()).cloned())
    }

    /// Remove a key (test setup).
    pub fn clear(&self, key: &StorageKey) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key.as_str());
        }
    }

    /// Number of `set_raw` calls that reached the backend.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), RemoteError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(RemoteError::Unreachable {
                endpoint: "in-memory".to_string(),
                reason: "backend marked unreachable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteBackend for InMemoryRemote {
    async fn get_raw(&self, key: &StorageKey) -> Result<RemoteRead, RemoteError> {
        self.check_reachable()?;
        let entries = self.entries.lock().map_err(|_| RemoteError::Unreachable {
            endpoint: "in-memory".to_string(),
            reason: "lock poisoned".to_string(),
        })?;
        Ok(match entries.get(key.as_str()) {
            Some(payload) => RemoteRead::Value(payload.clone()),
            None => RemoteRead::Absent,
        })
    }

    async fn set_raw(&self, key: &StorageKey, payload: &[u8]) -> Result<(), RemoteError> {
        self.check_reachable()?;
        let mut entries = self.entries.lock().map_err(|_| RemoteError::Unreachable {
            endpoint: "in-memory".to_string(),
            reason: "lock poisoned".to_string(),
        })?;
        entries.insert(key.as_str().to_string(), payload.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
