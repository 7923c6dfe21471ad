//! Hookslot Core - Data Types
//!
//! Data types, key derivation, configuration, and the error taxonomy.
//! All other crates depend on this; it holds no I/O.

pub mod config;
pub mod error;
pub mod key;
pub mod types;

pub use config::StoreConfig;
pub use error::{
    CacheError, ConfigError, HookslotError, HookslotResult, RemoteError, SlotError, StoreError,
};
pub use key::{hash_key, StorageKey};
pub use types::{
    LogEntry, Observation, SlotContent, SlotDocument, DEFAULT_LOG_CAPACITY, DEFAULT_SLOT_IDS,
};
