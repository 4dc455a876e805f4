//! # Session store
//!
//! In-process key-value session store with bounded per-key undo history and
//! pluggable value-equality (fingerprint) rules.
//!
//! ## Quick Start
//!
//! ```
//! use sessionstore::prelude::*;
//!
//! let mut store = VersionedStore::new(5);
//!
//! store.set("greeting", "Hello, World!");
//! store.set("greeting", "Goodbye!");
//! store.undo("greeting");
//! assert_eq!(store.get("greeting"), Some(&Value::from("Hello, World!")));
//!
//! // Setting an equal value records nothing
//! store.set("greeting", "Hello, World!");
//! assert_eq!(store.history_len("greeting"), 1);
//! ```
//!
//! ## Fingerprints
//!
//! Whether a write changes anything is decided by comparing fingerprints.
//! By default a value is serialized with `bincode` and hashed with SHA-256.
//! A custom rule can be registered per [`ValueType`], which is how host
//! values wrapped in [`OpaqueValue`] (which the default scheme cannot
//! serialize) get deduplicated.
//!
//! ## Diagnostics
//!
//! No lenient operation fails. Rule failures, unserializable values, and
//! exhausted undos are reported through a [`DiagnosticSink`]; the default
//! sink logs them with `tracing`.

#![warn(missing_docs)]

mod config;
mod diagnostics;
mod error;
mod fingerprint;
mod history;
mod store;

pub mod prelude;

// Re-export main entry points
pub use store::{SetOutcome, VersionedStore, VersionedStoreBuilder};
pub use config::{StoreConfig, DEFAULT_MAX_VERSIONS};
pub use error::{Error, Result};

pub use diagnostics::{Diagnostic, DiagnosticSink, RecordingSink, TracingSink};
pub use fingerprint::{default_fingerprint, FingerprintRegistry, FingerprintRule};
pub use history::History;

// Re-export core types
pub use sessionstore_core::{Fingerprint, FingerprintError, OpaqueValue, Value, ValueType};
