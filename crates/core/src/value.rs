//! Value types for the session store
//!
//! This module defines the value model stored under every key.
//!
//! ## Shapes
//!
//! Eight structural variants are introspectable and serializable by the
//! default fingerprint scheme. The ninth, [`Value::Opaque`], carries a host
//! value behind a type-erased `Arc`; it can be stored and fingerprinted by a
//! custom rule, but the default scheme rejects it.
//!
//! ## Equality Rules
//!
//! - Different variants are NEVER equal (no type coercion)
//! - `Int(1)` != `Float(1.0)`
//! - `String("abc")` != `Bytes([97, 98, 99])`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - Opaque values are equal only when they share the same allocation

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Dynamic value stored in a session.
///
/// `Object` uses a `BTreeMap` so that two equal objects always serialize to
/// the same bytes regardless of insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// Null / explicit absence of a value
    Null,

    /// Boolean true or false
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit IEEE-754 floating point
    Float(f64),

    /// UTF-8 encoded string
    String(String),

    /// Arbitrary binary data
    /// NOT equivalent to String - distinct type
    Bytes(Vec<u8>),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// String-keyed map of values, ordered by key
    Object(BTreeMap<String, Value>),

    /// Host value the store cannot introspect
    ///
    /// Never serialized: any attempt (including as a nested element) fails.
    #[serde(skip)]
    Opaque(OpaqueValue),
}

impl Value {
    /// Returns the type name as a string (for diagnostics)
    ///
    /// Opaque values report their declared type name.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Opaque(o) => o.type_name(),
        }
    }

    /// Returns the type identifier used to look up fingerprint rules
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Bytes(_) => ValueType::Bytes,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
            Value::Opaque(o) => ValueType::Opaque(o.type_name().to_string()),
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as bytes slice
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get as array slice
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Try to get as object reference
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Try to get as opaque reference
    pub fn as_opaque(&self) -> Option<&OpaqueValue> {
        match self {
            Value::Opaque(o) => Some(o),
            _ => None,
        }
    }
}

// ============================================================================
// Type identifiers
// ============================================================================

/// Type identifier of a [`Value`].
///
/// Fingerprint rules are registered per `ValueType`. Opaque values are keyed
/// by their declared type name, so distinct host types get distinct rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Float`]
    Float,
    /// [`Value::String`]
    String,
    /// [`Value::Bytes`]
    Bytes,
    /// [`Value::Array`]
    Array,
    /// [`Value::Object`]
    Object,
    /// [`Value::Opaque`] with the given type name
    Opaque(String),
}

impl ValueType {
    /// Type identifier for opaque values declared as `type_name`
    pub fn opaque(type_name: impl Into<String>) -> Self {
        ValueType::Opaque(type_name.into())
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Null => f.write_str("Null"),
            ValueType::Bool => f.write_str("Bool"),
            ValueType::Int => f.write_str("Int"),
            ValueType::Float => f.write_str("Float"),
            ValueType::String => f.write_str("String"),
            ValueType::Bytes => f.write_str("Bytes"),
            ValueType::Array => f.write_str("Array"),
            ValueType::Object => f.write_str("Object"),
            ValueType::Opaque(name) => write!(f, "Opaque({})", name),
        }
    }
}

impl From<&Value> for ValueType {
    fn from(value: &Value) -> Self {
        value.value_type()
    }
}

// ============================================================================
// Opaque values
// ============================================================================

/// Type-erased host value.
///
/// Cloning is cheap (the payload sits behind an `Arc`), and clones compare
/// equal to each other.
#[derive(Clone)]
pub struct OpaqueValue {
    type_name: Arc<str>,
    data: Arc<dyn Any + Send + Sync>,
}

impl OpaqueValue {
    /// Wrap `data` under the declared `type_name`
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, data: T) -> Self {
        Self {
            type_name: Arc::from(type_name.into()),
            data: Arc::new(data),
        }
    }

    /// Declared type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Borrow the payload as `T`, if that is what it holds
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// Check whether the payload is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.data.is::<T>()
    }

    fn data_addr(&self) -> usize {
        Arc::as_ptr(&self.data) as *const () as usize
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.data_addr() == other.data_addr()
    }
}

impl Eq for OpaqueValue {}

// ============================================================================
// Custom PartialEq Implementation (IEEE-754 semantics, no type coercion)
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754 equality: NaN != NaN, but -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a == b,

            // Different types: NEVER equal (NO TYPE COERCION)
            _ => false,
        }
    }
}

// Eq despite NaN != NaN; callers comparing floats should expect IEEE-754 semantics.
impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => {
                // -0.0 == 0.0, so both hash as 0
                if *f == 0.0 {
                    0u64.hash(state);
                } else {
                    f.to_bits().hash(state);
                }
            }
            Value::String(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Array(a) => {
                a.len().hash(state);
                for v in a {
                    v.hash(state);
                }
            }
            Value::Object(o) => {
                o.len().hash(state);
                for (k, v) in o {
                    k.hash(state);
                    v.hash(state);
                }
            }
            Value::Opaque(o) => {
                o.type_name().hash(state);
                o.data_addr().hash(state);
            }
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(o: BTreeMap<String, Value>) -> Self {
        Value::Object(o)
    }
}

impl From<OpaqueValue> for Value {
    fn from(o: OpaqueValue) -> Self {
        Value::Opaque(o)
    }
}

// ============================================================================
// Tests
// ============================================================================
