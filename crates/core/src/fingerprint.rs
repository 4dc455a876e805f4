//! Fingerprint tokens and fingerprinting failures

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque equality token for a value.
///
/// Two values with equal fingerprints are treated as the same value by the
/// store. Default fingerprints are lowercase hex SHA-256 digests; custom rules
/// may produce any string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Create a fingerprint from any token
    pub fn new(token: impl Into<String>) -> Self {
        Fingerprint(token.into())
    }

    /// Borrow the token
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the token
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Fingerprint {
    fn from(token: String) -> Self {
        Fingerprint(token)
    }
}

impl From<&str> for Fingerprint {
    fn from(token: &str) -> Self {
        Fingerprint(token.to_string())
    }
}

/// Failure to compute a fingerprint.
///
/// None of these escape the lenient store operations; they are reported as
/// diagnostics and recovered from locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    /// A custom rule returned an error
    #[error("fingerprint rule failed: {0}")]
    Rule(String),

    /// A custom rule panicked
    #[error("fingerprint rule panicked: {0}")]
    Panicked(String),

    /// The default scheme could not serialize the value
    #[error("value is not serializable: {0}")]
    Unserializable(String),
}

impl FingerprintError {
    /// Error for rule authors to return from a failing rule
    pub fn rule(reason: impl Into<String>) -> Self {
        FingerprintError::Rule(reason.into())
    }
}
