//! Slots and the slot registry.
//!
//! A slot is a named unit combining servable content with a circular log
//! of recorded requests, persisted as one [`SlotDocument`] through a
//! [`DualStore`]. Two lock layers guard it, acquired strictly
//! outermost-first: the slot lock wraps each read-modify-write cycle,
//! and the store's own key lock sits inside every `get`/`set`. No
//! operation ever holds two slots' locks at once, so no ordering cycle
//! can form.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use hookslot_core::{LogEntry, Observation, SlotContent, SlotDocument, SlotError, StoreError};

use crate::local::LocalCache;
use crate::remote::RemoteBackend;
use crate::store::DualStore;

/// A named slot: its lock and the store holding its document.
pub struct Slot {
    id: String,
    /// Slot-level lock, distinct from the store's internal key lock.
    /// Guards the whole read-modify-write cycle of one operation.
    lock: Mutex<()>,
    store: DualStore<SlotDocument>,
}

impl Slot {
    /// Create a slot whose freshly regenerated documents hold `capacity`
    /// log entries.
    pub fn new(
        id: impl Into<String>,
        capacity: usize,
        remote: Arc<dyn RemoteBackend>,
        cache: LocalCache,
    ) -> Self {
        let id = id.into();
        let store = DualStore::new(&id, SlotDocument::empty(capacity), remote, cache);
        Self {
            id,
            lock: Mutex::new(()),
            store,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The current document, unchanged.
    pub async fn read_logs(&self) -> Result<SlotDocument, StoreError> {
        let _guard = self.lock.lock().await;
        self.store.get().await
    }

    /// Record one observation into the circular log and return the
    /// content to serve.
    ///
    /// Read, advance, persist, serve: one atomic unit under the slot
    /// lock. Every HTTP verb lands here identically; the method carries
    /// no semantics at this layer.
    pub async fn record_and_serve(
        &self,
        observation: Observation,
    ) -> Result<SlotContent, StoreError> {
        let _guard = self.lock.lock().await;

        let mut doc = self.store.get().await?;
        let index = doc.record(LogEntry {
            timestamp: Utc::now(),
            request: observation,
        });
        self.store.set(&doc).await?;
        tracing::debug!(slot = %self.id, index, "recorded observation");
        Ok(doc.content)
    }

    /// Replace the slot's servable content.
    ///
    /// Authorization is the caller's job and happens before this point.
    pub async fn set_content(
        &self,
        content_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<SlotContent, StoreError> {
        let _guard = self.lock.lock().await;

        let mut doc = self.store.get().await?;
        doc.content = SlotContent {
            content_type: content_type.into(),
            data: data.into(),
        };
        self.store.set(&doc).await?;
        tracing::debug!(slot = %self.id, content_type = %doc.content.content_type, "content replaced");
        Ok(doc.content)
    }
}

/// Immutable mapping from identifier to slot, fully built at startup.
///
/// There is no dynamic registration: unknown identifiers are rejected
/// with [`SlotError::UnknownSlot`].
pub struct SlotRegistry {
    slots: HashMap<String, Slot>,
}

impl SlotRegistry {
    /// Build the registry for a fixed set of identifiers.
    ///
    /// Every slot shares the remote backend and cache directory but owns
    /// its store, key, and locks exclusively.
    pub fn new<I, S>(
        ids: I,
        capacity: usize,
        remote: Arc<dyn RemoteBackend>,
        cache: &LocalCache,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = ids
            .into_iter()
            .map(|id| {
                let id = id.into();
                let slot = Slot::new(id.clone(), capacity, Arc::clone(&remote), cache.clone());
                (id, slot)
            })
            .collect();
        Self { slots }
    }

    /// Look up a slot by identifier.
    pub fn resolve(&self, id: &str) -> Option<&Slot> {
        self.slots.get(id)
    }

    /// Identifiers this registry serves.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn get(&self, id: &str) -> Result<&Slot, SlotError> {
        self.resolve(id).ok_or_else(|| SlotError::UnknownSlot {
            id: id.to_string(),
        })
    }

    /// [`Slot::read_logs`] addressed by identifier.
    pub async fn read_logs(&self, id: &str) -> Result<SlotDocument, SlotError> {
        Ok(self.get(id)?.read_logs().await?)
    }

    /// [`Slot::record_and_serve`] addressed by identifier.
    pub async fn record_and_serve(
        &self,
        id: &str,
        observation: Observation,
    ) -> Result<SlotContent, SlotError> {
        Ok(self.get(id)?.record_and_serve(observation).await?)
    }

    /// [`Slot::set_content`] addressed by identifier.
    pub async fn set_content(
        &self,
        id: &str,
        content_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<SlotContent, SlotError> {
        Ok(self.get(id)?.set_content(content_type, data).await?)
    }
}
