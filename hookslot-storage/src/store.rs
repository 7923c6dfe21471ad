//! Dual-backend store for a single logical key.
//!
//! The remote backend is the fast, shared source of truth; the local cache
//! file is the durability backstop that lets this process restore state
//! the remote has lost. `get` reconciles the two, `set` writes both.
//! Every operation runs under the store's key-level mutex, so the two
//! backends are only ever mutated by one caller at a time.
//!
//! The read path is an explicit decision table rather than error-driven
//! control flow:
//!
//! | remote read         | then                                            |
//! |---------------------|-------------------------------------------------|
//! | value, parses       | mirror raw bytes to cache, return it            |
//! | value, malformed    | restore from local cache                        |
//! | absent              | restore from local cache                        |
//! | unreachable         | serve local copy read-only, or fail             |
//!
//! Restoring from the cache writes the file's raw bytes back to the
//! remote, keeping the two byte-identical; if the cache has no usable
//! copy either, the default value is regenerated into both backends.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use hookslot_core::{hash_key, RemoteError, StorageKey, StoreError};

use crate::local::{LocalCache, LocalRead};
use crate::remote::{RemoteBackend, RemoteRead};

/// Store keeping one logical value in a remote backend with a local
/// file-cache fallback.
///
/// One instance per identifier, created at startup and alive for the
/// process lifetime. The default value is a per-store template that is
/// deep-copied on every regeneration, never shared between stores.
pub struct DualStore<T> {
    key: StorageKey,
    default: T,
    remote: Arc<dyn RemoteBackend>,
    cache: LocalCache,
    /// Serializes the reconciliation sequence for this key. Acquired inside
    /// the slot lock when a slot owns this store; never the other way round.
    lock: Mutex<()>,
}

impl<T> DualStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Create a store for `identifier`, hashing it into the storage key.
    pub fn new(
        identifier: &str,
        default: T,
        remote: Arc<dyn RemoteBackend>,
        cache: LocalCache,
    ) -> Self {
        Self {
            key: hash_key(identifier),
            default,
            remote,
            cache,
            lock: Mutex::new(()),
        }
    }

    /// The hashed key this store addresses in both backends.
    pub fn key(&self) -> &StorageKey {
        &self.key
    }

    /// Read the current value, reconciling the two backends.
    ///
    /// On the non-degraded paths both backends hold byte-identical JSON
    /// for this key afterwards. When the remote is unreachable the local
    /// copy is served read-only if it parses; otherwise
    /// [`StoreError::RemoteUnreachable`] is returned, so callers can
    /// always tell "key empty" from "backend down".
    pub async fn get(&self) -> Result<T, StoreError> {
        let _guard = self.lock.lock().await;

        match self.remote.get_raw(&self.key).await {
            Ok(RemoteRead::Value(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    if let Err(err) = self.cache.write(&self.key, &bytes).await {
                        tracing::warn!(key = %self.key, %err, "failed to mirror remote payload to local cache");
                    }
                    Ok(value)
                }
                Err(err) => {
                    tracing::warn!(key = %self.key, %err, "remote payload malformed, restoring from local cache");
                    self.restore().await
                }
            },
            Ok(RemoteRead::Absent) => self.restore().await,
            Err(err @ RemoteError::Protocol { .. }) => {
                tracing::warn!(key = %self.key, %err, "remote replied garbage, restoring from local cache");
                self.restore().await
            }
            Err(err @ RemoteError::Unreachable { .. }) => {
                tracing::warn!(key = %self.key, %err, "remote unreachable, trying local cache read-only");
                self.degraded().await
            }
        }
    }

    /// Persist a value to both backends.
    ///
    /// The value is serialized once and the identical bytes go to the
    /// remote and the cache file. One failed side is tolerated (the next
    /// `get` reconciles it) and logged; both sides failing is an error.
    pub async fn set(&self, value: &T) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let bytes = serde_json::to_vec(value).map_err(|err| StoreError::SerializeFailed {
            key: self.key.clone(),
            reason: err.to_string(),
        })?;

        let remote_result = self.remote.set_raw(&self.key, &bytes).await;
        let cache_result = self.cache.write(&self.key, &bytes).await;

        match (remote_result, cache_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(err), Ok(())) => {
                tracing::warn!(key = %self.key, %err, "remote write failed, local cache holds the value");
                Ok(())
            }
            (Ok(()), Err(err)) => {
                tracing::warn!(key = %self.key, %err, "local cache write failed, remote holds the value");
                Ok(())
            }
            (Err(remote), Err(cache)) => Err(StoreError::PersistFailed {
                key: self.key.clone(),
                remote,
                cache,
            }),
        }
    }

    /// The remote answered but held nothing usable: restore it from the
    /// local cache, or regenerate both backends from the default.
    async fn restore(&self) -> Result<T, StoreError> {
        match self.cache.read(&self.key).await {
            LocalRead::Value(bytes) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    // Push the file's raw bytes back so the two backends
                    // stay byte-identical.
                    if let Err(err) = self.remote.set_raw(&self.key, &bytes).await {
                        tracing::warn!(key = %self.key, %err, "failed to restore local backup to remote");
                    }
                    Ok(value)
                }
                Err(err) => {
                    tracing::warn!(key = %self.key, %err, "local cache malformed, regenerating default");
                    self.regenerate().await
                }
            },
            LocalRead::Missing => self.regenerate().await,
            LocalRead::Unreadable { reason } => {
                tracing::warn!(key = %self.key, reason = %reason, "local cache unreadable, regenerating default");
                self.regenerate().await
            }
        }
    }

    /// Neither backend has a usable copy: seed both with the default.
    async fn regenerate(&self) -> Result<T, StoreError> {
        let value = self.default.clone();
        let bytes = serde_json::to_vec(&value).map_err(|err| StoreError::SerializeFailed {
            key: self.key.clone(),
            reason: err.to_string(),
        })?;

        if let Err(err) = self.remote.set_raw(&self.key, &bytes).await {
            tracing::warn!(key = %self.key, %err, "failed to seed remote with default value");
        }
        if let Err(err) = self.cache.write(&self.key, &bytes).await {
            tracing::warn!(key = %self.key, %err, "failed to seed local cache with default value");
        }
        Ok(value)
    }

    /// The remote is down: serve the local copy without writing anywhere.
    async fn degraded(&self) -> Result<T, StoreError> {
        match self.cache.read(&self.key).await {
            LocalRead::Value(bytes) => {
                serde_json::from_slice::<T>(&bytes).map_err(|_| StoreError::RemoteUnreachable {
                    key: self.key.clone(),
                })
            }
            LocalRead::Missing | LocalRead::Unreadable { .. } => {
                Err(StoreError::RemoteUnreachable {
                    key: self.key.clone(),
                })
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
