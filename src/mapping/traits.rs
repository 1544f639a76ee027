//! Traits at the boundary with the external mapping store.

use super::{ShardKey, StoreError};
use std::sync::Arc;

/// Read-only point lookups into a composite-key, string-valued table.
///
/// Implementations own loading and refreshing. A lookup that races a reload
/// must see either the old or the new generation, never a mix.
pub trait CompositeKeyLookup: Send + Sync {
    /// Looks up `attribute` for `key`.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - the stored value
    /// * `Ok(None)` - no entry for the key, or no such attribute
    /// * `Err(_)` - the mapping cannot be read
    fn lookup(&self, key: &ShardKey, attribute: &str) -> Result<Option<String>, StoreError>;
}

/// Hands out mappings by their logical name.
pub trait MappingRegistry: Send + Sync {
    /// Returns the mapping registered under `name`.
    fn get(&self, name: &str) -> Result<Arc<dyn CompositeKeyLookup>, StoreError>;
}
