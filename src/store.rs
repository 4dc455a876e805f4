//! The versioned session store.
//!
//! [`VersionedStore`] keeps, per key, the current value, the fingerprint of
//! that value, and a bounded history of prior values for undo. A write whose
//! fingerprint matches the stored one is skipped entirely.
//!
//! # Example
//!
//! ```
//! use sessionstore::prelude::*;
//!
//! let mut store = VersionedStore::new(2);
//! store.set("x", 1);
//! store.set("x", 2);
//! store.set("x", 3);
//!
//! store.undo("x");
//! assert_eq!(store.get("x"), Some(&Value::Int(2)));
//! store.undo("x");
//! assert_eq!(store.get("x"), Some(&Value::Int(1)));
//!
//! // Only two prior values were kept
//! store.undo("x");
//! assert_eq!(store.get("x"), Some(&Value::Int(1)));
//! ```
//!
//! # Concurrency
//!
//! The store has no internal locking. Mutation takes `&mut self`; callers
//! sharing a store across threads wrap it in a mutex or keep one store per
//! session.

use crate::config::StoreConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::{Error, Result};
use crate::fingerprint::{FingerprintRegistry, FingerprintRule};
use crate::history::History;
use rustc_hash::FxHashMap;
use sessionstore_core::{Fingerprint, FingerprintError, Value, ValueType};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Result of a write through [`VersionedStore::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The value was stored and the prior value pushed onto history
    Recorded,
    /// The fingerprint matched the stored one; nothing changed
    Unchanged,
}

#[derive(Debug, Clone)]
struct Entry {
    current: Option<Value>,
    /// `None` when the key is absent or its fingerprint was unavailable
    fingerprint: Option<Fingerprint>,
    history: History,
}

impl Entry {
    fn new(max_versions: usize) -> Self {
        Self {
            current: None,
            fingerprint: None,
            history: History::new(max_versions),
        }
    }

    fn write(&mut self, value: Value, fingerprint: Option<Fingerprint>) -> SetOutcome {
        // An unavailable fingerprint never matches, not even another unavailable one
        if let (Some(stored), Some(new)) = (&self.fingerprint, &fingerprint) {
            if stored == new {
                return SetOutcome::Unchanged;
            }
        }

        let prior = self.current.take();
        if self.history.push(prior).is_some() {
            trace!(capacity = self.history.capacity(), "evicted oldest history entry");
        }
        self.current = Some(value);
        self.fingerprint = fingerprint;
        SetOutcome::Recorded
    }
}

/// In-process key-value store with bounded per-key undo.
///
/// Create one with [`VersionedStore::new`], [`VersionedStore::builder`], or
/// [`VersionedStore::from_config`].
pub struct VersionedStore {
    entries: FxHashMap<String, Entry>,
    rules: FingerprintRegistry,
    max_versions: usize,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl VersionedStore {
    /// Create a store keeping at most `max_versions` prior values per key.
    ///
    /// Diagnostics go to `tracing`.
    pub fn new(max_versions: usize) -> Self {
        Self::builder().max_versions(max_versions).build()
    }

    /// Create a store with an initial set of custom fingerprint rules.
    pub fn with_fingerprint_rules<I>(max_versions: usize, rules: I) -> Self
    where
        I: IntoIterator<Item = (ValueType, Arc<dyn FingerprintRule>)>,
    {
        let mut store = Self::new(max_versions);
        for (value_type, rule) in rules {
            store.rules.insert(value_type, rule);
        }
        store
    }

    /// Create a store from serialized settings.
    pub fn from_config(config: StoreConfig) -> Self {
        VersionedStoreBuilder::from_config(config).build()
    }

    /// Create a builder for store configuration.
    pub fn builder() -> VersionedStoreBuilder {
        VersionedStoreBuilder::new()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Store `value` under `key`.
    ///
    /// Skipped when the value's fingerprint equals the stored one. Otherwise
    /// the current value (or the absent marker for a new key) is pushed onto
    /// the key's history, evicting the oldest entry past `max_versions`.
    /// Never fails; fingerprinting problems are reported as diagnostics.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.put(key, value);
    }

    /// Store `value` under `key`, reporting whether anything changed.
    ///
    /// Same semantics as [`set`](Self::set).
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> SetOutcome {
        let key = key.into();
        let value = value.into();
        let fingerprint = self.rules.compute(&value, self.diagnostics.as_ref());

        if let Some(entry) = self.entries.get_mut(&key) {
            let outcome = entry.write(value, fingerprint);
            debug!(key = %key, ?outcome, history = entry.history.len(), "set");
            return outcome;
        }

        let mut entry = Entry::new(self.max_versions);
        let outcome = entry.write(value, fingerprint);
        debug!(key = %key, ?outcome, history = entry.history.len(), "set new key");
        self.entries.insert(key, entry);
        outcome
    }

    /// Revert `key` to its most recent prior value.
    ///
    /// Reverting past the first write makes the key absent again. With no
    /// history left this is a no-op that emits [`Diagnostic::UndoExhausted`].
    pub fn undo(&mut self, key: &str) {
        if let Err(Error::UndoExhausted { key }) = self.try_undo(key) {
            self.diagnostics.emit(&Diagnostic::UndoExhausted { key });
        }
    }

    /// Revert `key` to its most recent prior value, or fail if there is none.
    ///
    /// # Errors
    ///
    /// [`Error::UndoExhausted`] when the key is unknown or its history is empty.
    pub fn try_undo(&mut self, key: &str) -> Result<()> {
        let exhausted = || Error::UndoExhausted {
            key: key.to_string(),
        };

        let entry = self.entries.get_mut(key).ok_or_else(exhausted)?;
        let prior = entry.history.pop().ok_or_else(exhausted)?;

        entry.fingerprint = prior
            .as_ref()
            .and_then(|value| self.rules.compute(value, self.diagnostics.as_ref()));
        entry.current = prior;
        debug!(
            key = %key,
            absent = entry.current.is_none(),
            remaining = entry.history.len(),
            "undo applied"
        );
        Ok(())
    }

    // =========================================================================
    // Fingerprint rules
    // =========================================================================

    /// Register (`Some`) or remove (`None`) the custom fingerprint rule for a type.
    ///
    /// Removing reverts the type to the default scheme. Stored fingerprints
    /// are not recomputed; the new rule applies from the next write.
    pub fn set_fingerprint_function(
        &mut self,
        value_type: impl Into<ValueType>,
        rule: Option<Arc<dyn FingerprintRule>>,
    ) {
        let value_type = value_type.into();
        match rule {
            Some(rule) => {
                self.rules.insert(value_type.clone(), rule);
                self.diagnostics
                    .emit(&Diagnostic::FingerprintRuleRegistered { value_type });
            }
            None => {
                if self.rules.remove(&value_type).is_some() {
                    self.diagnostics
                        .emit(&Diagnostic::FingerprintRuleRemoved { value_type });
                }
            }
        }
    }

    /// Register a closure as the fingerprint rule for a type.
    pub fn register_fingerprint_rule<F>(&mut self, value_type: impl Into<ValueType>, rule: F)
    where
        F: Fn(&Value) -> std::result::Result<Fingerprint, FingerprintError>
            + Send
            + Sync
            + 'static,
    {
        self.set_fingerprint_function(value_type, Some(Arc::new(rule)));
    }

    /// Remove the rule for a type, returning whether one was registered.
    pub fn remove_fingerprint_rule(&mut self, value_type: impl Into<ValueType>) -> bool {
        let value_type = value_type.into();
        let existed = self.rules.contains(&value_type);
        self.set_fingerprint_function(value_type, None);
        existed
    }

    /// Check if a type has a custom rule
    pub fn has_fingerprint_rule(&self, value_type: &ValueType) -> bool {
        self.rules.contains(value_type)
    }

    /// Fingerprint `value` the way [`set`](Self::set) would.
    ///
    /// `None` means the fingerprint is unavailable.
    pub fn fingerprint_of(&self, value: &Value) -> Option<Fingerprint> {
        self.rules.compute(value, self.diagnostics.as_ref())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current value of `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).and_then(|e| e.current.as_ref())
    }

    /// Current value of `key`, or `default` when absent
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.get(key).unwrap_or(default)
    }

    /// Read-only view of every present key and its current value, ordered by key
    pub fn show(&self) -> BTreeMap<&str, &Value> {
        self.entries
            .iter()
            .filter_map(|(k, e)| e.current.as_ref().map(|v| (k.as_str(), v)))
            .collect()
    }

    /// Undo history for `key`, oldest first
    pub fn history(&self, key: &str) -> Option<&History> {
        self.entries.get(key).map(|e| &e.history)
    }

    /// Number of undo steps available for `key`
    pub fn history_len(&self, key: &str) -> usize {
        self.history(key).map_or(0, History::len)
    }

    /// Fingerprint stored for the current value of `key`
    pub fn stored_fingerprint(&self, key: &str) -> Option<&Fingerprint> {
        self.entries.get(key).and_then(|e| e.fingerprint.as_ref())
    }

    /// Check if `key` currently has a value
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys that currently have a value, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(|(_, e)| e.current.is_some())
            .map(|(k, _)| k.as_str())
    }

    /// Number of keys that currently have a value
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    /// Check if no key currently has a value
    pub fn is_empty(&self) -> bool {
        self.keys().next().is_none()
    }

    /// Configured history depth
    pub fn max_versions(&self) -> usize {
        self.max_versions
    }
}

impl Default for VersionedStore {
    fn default() -> Self {
        Self::from_config(StoreConfig::default())
    }
}

impl fmt::Debug for VersionedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedStore")
            .field("keys", &self.entries.len())
            .field("max_versions", &self.max_versions)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

/// Builder for store configuration.
///
/// # Example
///
/// ```
/// use sessionstore::prelude::*;
/// use std::sync::Arc;
///
/// let sink = Arc::new(RecordingSink::new());
/// let mut store = VersionedStore::builder()
///     .max_versions(3)
///     .fingerprint_rule(ValueType::Int, |_: &Value| Ok(Fingerprint::from("int")))
///     .diagnostics(sink.clone())
///     .build();
///
/// store.undo("missing");
/// assert_eq!(sink.len(), 1);
/// ```
pub struct VersionedStoreBuilder {
    config: StoreConfig,
    rules: FingerprintRegistry,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl VersionedStoreBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::from_config(StoreConfig::default())
    }

    /// Start from serialized settings.
    pub fn from_config(config: StoreConfig) -> Self {
        Self {
            config,
            rules: FingerprintRegistry::new(),
            diagnostics: None,
        }
    }

    /// Set the maximum number of prior values kept per key.
    pub fn max_versions(mut self, max_versions: usize) -> Self {
        self.config.max_versions = max_versions;
        self
    }

    /// Add an initial custom fingerprint rule.
    ///
    /// Initial rules are installed silently; no registration diagnostic is emitted.
    pub fn fingerprint_rule<F>(mut self, value_type: impl Into<ValueType>, rule: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<Fingerprint, FingerprintError>
            + Send
            + Sync
            + 'static,
    {
        self.rules.insert(value_type.into(), Arc::new(rule));
        self
    }

    /// Add an initial rule that is already shared.
    pub fn shared_fingerprint_rule(
        mut self,
        value_type: impl Into<ValueType>,
        rule: Arc<dyn FingerprintRule>,
    ) -> Self {
        self.rules.insert(value_type.into(), rule);
        self
    }

    /// Send diagnostics to `sink` instead of `tracing`.
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Build the store.
    pub fn build(self) -> VersionedStore {
        VersionedStore {
            entries: FxHashMap::default(),
            rules: self.rules,
            max_versions: self.config.max_versions,
            diagnostics: self.diagnostics.unwrap_or_else(|| Arc::new(TracingSink)),
        }
    }
}

impl Default for VersionedStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
