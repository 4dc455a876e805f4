//! Unified error types for the session store.
//!
//! The lenient store operations never return these; they exist for the
//! return-status variants (`try_undo`, `StoreConfig::from_json`) and for
//! callers who want the strict fingerprinting result.

use sessionstore_core::FingerprintError;
use thiserror::Error;

/// All session store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// `try_undo` was called for a key with no remaining history
    #[error("no more undos available for key: {key}")]
    UndoExhausted {
        /// Key that had nothing to undo
        key: String,
    },

    /// Fingerprint computation failed
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    /// Configuration could not be parsed
    #[error("config error: {0}")]
    Config(String),
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is an exhausted-undo error.
    pub fn is_undo_exhausted(&self) -> bool {
        matches!(self, Error::UndoExhausted { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
