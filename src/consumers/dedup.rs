//! # Delivery Deduplication
//!
//! At-least-once delivery makes duplicates a fact of life; this registry is
//! how a consumer tells an original from a repeat.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Records which (correlation id, event type) pairs a consumer has handled.
///
/// The check-and-set goes through the map's entry API, so concurrent workers
/// racing on the same redelivery agree on exactly one winner.
#[derive(Debug, Default)]
pub struct DedupRegistry {
    seen: DashMap<(String, String), DateTime<Utc>>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self {
            seen: DashMap::new(),
        }
    }

    /// Claim the pair. Returns `true` only for the first caller; every later
    /// call with the same pair gets `false`.
    pub fn first_seen(&self, correlation_id: &str, event_type: &str) -> bool {
        let key = (correlation_id.to_string(), event_type.to_string());
        match self.seen.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Utc::now());
                true
            }
        }
    }

    pub fn is_seen(&self, correlation_id: &str, event_type: &str) -> bool {
        self.seen
            .contains_key(&(correlation_id.to_string(), event_type.to_string()))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
