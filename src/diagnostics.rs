//! Non-fatal diagnostics emitted by the store.
//!
//! Nothing the store reports here is surfaced as an error from the lenient
//! operations. Integrators that need to react to fingerprinting failures or
//! exhausted undos inject a [`DiagnosticSink`]; the default [`TracingSink`]
//! forwards everything to `tracing`.

use parking_lot::Mutex;
use sessionstore_core::{FingerprintError, ValueType};
use std::fmt;
use tracing::{info, warn};

/// A non-fatal notice from the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A registered rule failed; the default rule was used instead
    CustomFingerprintFailure {
        /// Type the rule is registered for
        value_type: ValueType,
        /// What the rule reported
        error: FingerprintError,
    },

    /// The default scheme could not serialize the value; its fingerprint is unavailable
    DefaultSerializationFailure {
        /// Type of the value that failed
        value_type: ValueType,
        /// Serializer failure
        error: FingerprintError,
    },

    /// `undo` was called with no history left
    UndoExhausted {
        /// Key that had nothing to undo
        key: String,
    },

    /// A custom rule was added or replaced
    FingerprintRuleRegistered {
        /// Type the rule applies to
        value_type: ValueType,
    },

    /// A custom rule was removed; the type reverts to the default rule
    FingerprintRuleRemoved {
        /// Type that lost its rule
        value_type: ValueType,
    },
}

impl Diagnostic {
    /// Check if this reports a fingerprinting failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Diagnostic::CustomFingerprintFailure { .. }
                | Diagnostic::DefaultSerializationFailure { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::CustomFingerprintFailure { value_type, error } => {
                write!(f, "error using custom fingerprint rule for {}: {}", value_type, error)
            }
            Diagnostic::DefaultSerializationFailure { value_type, error } => {
                write!(f, "could not fingerprint value of type {}: {}", value_type, error)
            }
            Diagnostic::UndoExhausted { key } => {
                write!(f, "no more undos available for key: {}", key)
            }
            Diagnostic::FingerprintRuleRegistered { value_type } => {
                write!(f, "fingerprint rule for {} has been added/modified", value_type)
            }
            Diagnostic::FingerprintRuleRemoved { value_type } => {
                write!(f, "fingerprint rule for {} removed, using default", value_type)
            }
        }
    }
}

/// Receiver for store diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Handle one diagnostic
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Default sink: structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::CustomFingerprintFailure { value_type, error } => {
                warn!(%value_type, %error, "custom fingerprint rule failed, falling back to default");
            }
            Diagnostic::DefaultSerializationFailure { value_type, error } => {
                warn!(%value_type, %error, "fingerprint unavailable, value will always be treated as changed");
            }
            Diagnostic::UndoExhausted { key } => {
                info!(key = %key, "no more undos available");
            }
            Diagnostic::FingerprintRuleRegistered { value_type } => {
                info!(%value_type, "fingerprint rule registered");
            }
            Diagnostic::FingerprintRuleRemoved { value_type } => {
                info!(%value_type, "fingerprint rule removed, using default");
            }
        }
    }
}

/// Sink that keeps every diagnostic for later inspection.
///
/// Also forwards to [`TracingSink`], so recording does not silence logs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    recorded: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.recorded.lock().clone()
    }

    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.recorded.lock())
    }

    /// Number of recorded diagnostics
    pub fn len(&self) -> usize {
        self.recorded.lock().len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.recorded.lock().is_empty()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        TracingSink.emit(diagnostic);
        self.recorded.lock().push(diagnostic.clone());
    }
}
