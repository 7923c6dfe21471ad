//! Error types for Hookslot operations

use crate::StorageKey;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Remote backend errors.
///
/// `Unreachable` is a connection-level failure and is deliberately distinct
/// from an absent key: the fallback algorithm treats the two differently.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Remote backend unreachable at {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },

    #[error("Remote protocol error: {reason}")]
    Protocol { reason: String },
}

/// Local cache file errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Failed to write cache file {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

/// Dual-backend store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The remote is down and the local cache held no usable copy.
    #[error("Remote unreachable and no usable local copy for key {key}")]
    RemoteUnreachable { key: StorageKey },

    /// Both backends rejected the write.
    #[error("Persisting key {key} failed on both backends: remote: {remote}; cache: {cache}")]
    PersistFailed {
        key: StorageKey,
        remote: RemoteError,
        cache: CacheError,
    },

    #[error("Failed to serialize value for key {key}: {reason}")]
    SerializeFailed { key: StorageKey, reason: String },
}

/// Slot-level errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("Unknown slot identifier: {id}")]
    UnknownSlot { id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Master error type for all Hookslot errors.
#[derive(Debug, Clone, Error)]
pub enum HookslotError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Slot error: {0}")]
    Slot(#[from] SlotError),
}

/// Result type alias for Hookslot operations.
pub type HookslotResult<T> = Result<T, HookslotError>;

// =============================================================================
// TESTS
// =============================================================================
