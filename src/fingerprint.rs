//! Fingerprint rules and the per-type registry.
//!
//! A fingerprint is computed by the rule registered for the value's
//! [`ValueType`], falling back to the default scheme (bincode serialization,
//! then SHA-256) when no rule is registered or the registered rule fails.
//! If the default scheme cannot serialize the value, the fingerprint is
//! unavailable (`None`).

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use rustc_hash::FxHashMap;
use sessionstore_core::{Fingerprint, FingerprintError, Value, ValueType};
use sha2::{Digest, Sha256};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Custom fingerprint strategy for one value type.
///
/// Implemented for every `Fn(&Value) -> Result<Fingerprint, FingerprintError>`
/// closure, so most rules are plain closures:
///
/// ```
/// use sessionstore::prelude::*;
///
/// let mut store = VersionedStore::new(3);
/// store.register_fingerprint_rule(ValueType::String, |v: &Value| {
///     Ok(Fingerprint::from(v.as_str().unwrap_or_default().to_lowercase()))
/// });
/// ```
pub trait FingerprintRule: Send + Sync {
    /// Compute the fingerprint of `value`
    fn fingerprint(&self, value: &Value) -> Result<Fingerprint, FingerprintError>;
}

impl<F> FingerprintRule for F
where
    F: Fn(&Value) -> Result<Fingerprint, FingerprintError> + Send + Sync,
{
    fn fingerprint(&self, value: &Value) -> Result<Fingerprint, FingerprintError> {
        self(value)
    }
}

/// Default scheme: bincode bytes, SHA-256, lowercase hex.
///
/// Fails with [`FingerprintError::Unserializable`] for values containing an
/// opaque payload anywhere in their structure.
pub fn default_fingerprint(value: &Value) -> Result<Fingerprint, FingerprintError> {
    let bytes = bincode::serialize(value)
        .map_err(|e| FingerprintError::Unserializable(e.to_string()))?;
    let digest = Sha256::digest(&bytes);
    Ok(Fingerprint::new(format!("{:x}", digest)))
}

/// Store-wide mapping from value type to custom rule.
#[derive(Clone, Default)]
pub struct FingerprintRegistry {
    rules: FxHashMap<ValueType, Arc<dyn FingerprintRule>>,
}

impl FingerprintRegistry {
    /// Create an empty registry (every type uses the default scheme)
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the rule for `value_type`, returning the previous one
    pub fn insert(
        &mut self,
        value_type: ValueType,
        rule: Arc<dyn FingerprintRule>,
    ) -> Option<Arc<dyn FingerprintRule>> {
        self.rules.insert(value_type, rule)
    }

    /// Remove the rule for `value_type`, returning it if there was one
    pub fn remove(&mut self, value_type: &ValueType) -> Option<Arc<dyn FingerprintRule>> {
        self.rules.remove(value_type)
    }

    /// Check if `value_type` has a custom rule
    pub fn contains(&self, value_type: &ValueType) -> bool {
        self.rules.contains_key(value_type)
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if no custom rule is registered
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compute the fingerprint of `value`, reporting failures to `sink`.
    ///
    /// Returns `None` when the fingerprint is unavailable.
    pub fn compute(&self, value: &Value, sink: &dyn DiagnosticSink) -> Option<Fingerprint> {
        let value_type = value.value_type();

        if let Some(rule) = self.rules.get(&value_type) {
            match invoke(rule.as_ref(), value) {
                Ok(fp) => return Some(fp),
                Err(error) => sink.emit(&Diagnostic::CustomFingerprintFailure {
                    value_type: value_type.clone(),
                    error,
                }),
            }
        }

        match default_fingerprint(value) {
            Ok(fp) => Some(fp),
            Err(error) => {
                sink.emit(&Diagnostic::DefaultSerializationFailure { value_type, error });
                None
            }
        }
    }
}

impl fmt::Debug for FingerprintRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.rules.keys().collect();
        types.sort();
        f.debug_struct("FingerprintRegistry")
            .field("types", &types)
            .finish()
    }
}

/// Run a rule, turning a panic into an error.
fn invoke(rule: &dyn FingerprintRule, value: &Value) -> Result<Fingerprint, FingerprintError> {
    panic::catch_unwind(AssertUnwindSafe(|| rule.fingerprint(value)))
        .unwrap_or_else(|payload| Err(FingerprintError::Panicked(panic_message(payload))))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
