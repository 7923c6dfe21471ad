//! Slot document types and the circular log state machine.
//!
//! A `SlotDocument` is the JSON value a slot persists through its store:
//! the servable content plus a fixed-capacity circular log of recorded
//! requests. The serialized field names are part of the wire format and
//! must not change: the same bytes live in the remote backend and the
//! local cache file and round-trip exactly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of log entries a slot retains.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// The fixed set of slot identifiers in the reference deployment.
pub const DEFAULT_SLOT_IDS: [&str; 16] = [
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p",
];

/// Servable content of a slot: a media type and an opaque payload string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotContent {
    /// Media type served with the payload, e.g. `text/plain`.
    #[serde(rename = "type")]
    pub content_type: String,
    pub data: String,
}

impl SlotContent {
    /// Empty plain-text content, the state of a freshly created slot.
    pub fn empty() -> Self {
        Self {
            content_type: "text/plain".to_string(),
            data: String::new(),
        }
    }
}

/// One recorded inbound request.
///
/// Opaque to the store layers; the HTTP layer fills it in. Maps use
/// `BTreeMap` so serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Request line, e.g. `GET /s/a HTTP/1.1`.
    pub req_line: String,
    /// Peer address, if known.
    pub host: Option<String>,
    pub port: Option<u16>,
    pub headers: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    /// Raw request body, lossily decoded as UTF-8.
    pub body_data: String,
}

/// A log slot: an arrival timestamp plus the captured request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub request: Observation,
}

/// The JSON document a slot stores: current content plus the circular log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDocument {
    /// Index of the most recently written log entry.
    pub cur_index: usize,
    pub content: SlotContent,
    /// Fixed-length sequence of log slots; empty slots are `null` on the wire.
    pub logs: Vec<Option<LogEntry>>,
}

impl SlotDocument {
    /// A fresh document: empty content and `capacity` empty log slots.
    pub fn empty(capacity: usize) -> Self {
        Self {
            cur_index: 0,
            content: SlotContent::empty(),
            logs: vec![None; capacity],
        }
    }

    /// Number of log slots this document holds.
    ///
    /// Rotation uses this, not the configured constant, so a document
    /// persisted under a different capacity keeps advancing correctly.
    pub fn capacity(&self) -> usize {
        self.logs.len()
    }

    /// Append an entry to the circular log.
    ///
    /// Advances `cur_index` circularly and overwrites the entry at the new
    /// index. Returns the index written. An out-of-range `cur_index` in a
    /// hand-edited document is healed by the modulo.
    pub fn record(&mut self, entry: LogEntry) -> usize {
        if self.logs.is_empty() {
            self.logs.push(Some(entry));
            self.cur_index = 0;
            return 0;
        }
        let next = (self.cur_index + 1) % self.logs.len();
        self.logs[next] = Some(entry);
        self.cur_index = next;
        next
    }

    /// The most recently recorded entry, if any.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.logs.get(self.cur_index).and_then(|slot| slot.as_ref())
    }

    /// Number of occupied log slots.
    pub fn recorded(&self) -> usize {
        self.logs.iter().filter(|slot| slot.is_some()).count()
    }
}

// =============================================================================
// TESTS
// =============================================================================
