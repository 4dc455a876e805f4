//! Convenient imports for the session store.
//!
//! ```
//! use sessionstore::prelude::*;
//!
//! let mut store = VersionedStore::new(3);
//! store.set("key", "value");
//! ```

// Main entry point
pub use crate::store::{SetOutcome, VersionedStore, VersionedStoreBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Fingerprinting and diagnostics
pub use crate::diagnostics::{Diagnostic, DiagnosticSink, RecordingSink};
pub use crate::fingerprint::FingerprintRule;

// Core types
pub use sessionstore_core::{Fingerprint, FingerprintError, OpaqueValue, Value, ValueType};
