//! Store configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// History depth used when none is configured.
pub const DEFAULT_MAX_VERSIONS: usize = 5;

/// Serializable store settings.
///
/// Custom fingerprint rules are code, not data, so they are supplied through
/// [`VersionedStoreBuilder`](crate::VersionedStoreBuilder) instead.
///
/// # Example
///
/// ```
/// use sessionstore::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{ "max_versions": 10 }"#).unwrap();
/// assert_eq!(config.max_versions, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of prior values kept per key
    pub max_versions: usize,
}

impl StoreConfig {
    /// Config with the given history depth
    pub fn new(max_versions: usize) -> Self {
        Self { max_versions }
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_versions: DEFAULT_MAX_VERSIONS,
        }
    }
}
