//! Device registry record
//!
//! The registry is a single store entry listing every identifier ever
//! created, in creation order. It only grows.

use crate::error::{Error, Result};
use crate::types::DeviceId;
use serde::{Deserialize, Deserializer, Serialize};

/// Ordered, append-only list of known device identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRegistry {
    #[serde(rename = "imeis", default, deserialize_with = "null_as_empty")]
    ids: Vec<DeviceId>,
}

impl DeviceRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an identifier
    ///
    /// Duplicates are not filtered here; creation checks existence first.
    pub fn append(&mut self, id: DeviceId) {
        self.ids.push(id);
    }

    /// Identifiers in creation order
    pub fn ids(&self) -> &[DeviceId] {
        &self.ids
    }

    /// Iterate identifiers in creation order
    pub fn iter(&self) -> impl Iterator<Item = &DeviceId> {
        self.ids.iter()
    }

    /// Number of registered identifiers
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Encode to the store's value format
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::corrupt("registry", e))
    }

    /// Decode the registry stored under `key`
    pub fn from_bytes(key: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::corrupt(key, e))
    }
}

// The legacy initializer marshalled an empty list as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<DeviceId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<DeviceId>>::deserialize(deserializer)?.unwrap_or_default())
}
