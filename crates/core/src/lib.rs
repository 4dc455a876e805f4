//! Core types for the session store
//!
//! This crate defines the data model shared by the store facade:
//! - [`Value`]: the dynamic value stored under a key
//! - [`ValueType`]: the type identifier fingerprint rules are registered under
//! - [`OpaqueValue`]: a host value the store carries but cannot introspect
//! - [`Fingerprint`] / [`FingerprintError`]: equality tokens and their failures

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fingerprint;
pub mod value;

pub use fingerprint::{Fingerprint, FingerprintError};
pub use value::{OpaqueValue, Value, ValueType};
