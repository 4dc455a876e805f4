//! Bounded per-key undo history.
//!
//! Entries are `Option<Value>`: `None` marks that the key was absent before
//! the write that pushed it.

use sessionstore_core::Value;
use std::collections::VecDeque;

/// Bounded FIFO of prior values, most recent last.
///
/// Pushing past `capacity` evicts the oldest entry. A capacity of zero keeps
/// nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: VecDeque<Option<Value>>,
    capacity: usize,
}

impl History {
    /// Create an empty history holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Maximum number of retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there is nothing to undo
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Push a prior value, returning the evicted oldest entry if the bound was exceeded
    pub fn push(&mut self, prior: Option<Value>) -> Option<Option<Value>> {
        self.entries.push_back(prior);
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Pop the most recent entry
    pub fn pop(&mut self) -> Option<Option<Value>> {
        self.entries.pop_back()
    }

    /// Most recent entry without removing it
    pub fn latest(&self) -> Option<Option<&Value>> {
        self.entries.back().map(Option::as_ref)
    }

    /// Iterate entries, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Option<&Value>> + '_ {
        self.entries.iter().map(Option::as_ref)
    }
}
