//! Classification History
//!
//! In-memory, insertion-ordered log of successful classifications.
//! Entries are never mutated. Without a capacity they are never dropped;
//! with one, the oldest entry is evicted first (ring buffer). A capacity of
//! zero means unbounded, as in `PHISHGUARD_HISTORY_CAPACITY`.
//!
//! Appends go through a single write lock, so concurrent requests cannot
//! lose or interleave entries.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

// ============================================================================
// ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    /// Rendered result string shown to the user
    pub label: String,
    pub recorded_at: DateTime<Utc>,
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: RwLock<VecDeque<HistoryEntry>>,
    capacity: Option<usize>,
}

impl HistoryStore {
    /// Unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store keeping only the newest `capacity` entries; `None` or `Some(0)`
    /// is unbounded
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        let capacity = capacity.filter(|&c| c > 0);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity.unwrap_or(0))),
            capacity,
        }
    }

    /// Append one entry and return it
    pub fn record(&self, url: impl Into<String>, label: impl Into<String>) -> HistoryEntry {
        let url = url.into();
        let label = label.into();

        // Stamp under the lock so timestamps follow insertion order
        let mut entries = self.entries.write();
        let entry = HistoryEntry {
            url,
            label,
            recorded_at: Utc::now(),
        };

        if let Some(capacity) = self.capacity {
            while entries.len() >= capacity {
                entries.pop_front();
            }
        }
        entries.push_back(entry.clone());

        entry
    }

    /// Snapshot of all entries, oldest first
    pub fn all(&self) -> Vec<HistoryEntry> {
        self.entries.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

}

// ============================================================================
// TESTS
// ============================================================================
