//! Named registry of mappings.

use super::{CompositeKeyLookup, MappingRegistry, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry handing out mappings by logical name.
///
/// Mappings can be registered or swapped while routers hold the catalog;
/// the next lookup picks up the new registration.
#[derive(Default)]
pub struct MappingCatalog {
    mappings: RwLock<HashMap<String, Arc<dyn CompositeKeyLookup>>>,
}

impl MappingCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `mapping` under `name`, returning the mapping it replaced.
    pub fn register(
        &self,
        name: impl Into<String>,
        mapping: Arc<dyn CompositeKeyLookup>,
    ) -> Result<Option<Arc<dyn CompositeKeyLookup>>, StoreError> {
        let mut mappings = self
            .mappings
            .write()
            .map_err(|_| StoreError::PublishFailed("catalog lock poisoned".to_string()))?;
        Ok(mappings.insert(name.into(), mapping))
    }

    /// Removes the mapping registered under `name`.
    pub fn unregister(&self, name: &str) -> Result<Option<Arc<dyn CompositeKeyLookup>>, StoreError> {
        let mut mappings = self
            .mappings
            .write()
            .map_err(|_| StoreError::PublishFailed("catalog lock poisoned".to_string()))?;
        Ok(mappings.remove(name))
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> Result<bool, StoreError> {
        let mappings = self
            .mappings
            .read()
            .map_err(|_| StoreError::Unavailable("catalog lock poisoned".to_string()))?;
        Ok(mappings.contains_key(name))
    }
}

impl MappingRegistry for MappingCatalog {
    fn get(&self, name: &str) -> Result<Arc<dyn CompositeKeyLookup>, StoreError> {
        let mappings = self
            .mappings
            .read()
            .map_err(|_| StoreError::Unavailable("catalog lock poisoned".to_string()))?;
        mappings
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::Unavailable(format!("mapping {} is not registered", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MemoryMapping;
    use std::thread;

    #[test]
    fn test_register_and_get() {
        let catalog = MappingCatalog::new();
        assert!(!catalog.contains("partition_map").unwrap());

        let previous = catalog
            .register("partition_map", Arc::new(MemoryMapping::new()))
            .unwrap();
        assert!(previous.is_none());
        assert!(catalog.contains("partition_map").unwrap());
        assert!(catalog.get("partition_map").is_ok());

        let previous = catalog
            .register("partition_map", Arc::new(MemoryMapping::new()))
            .unwrap();
        assert!(previous.is_some());
    }

    #[test]
    fn test_unknown_name_is_unavailable() {
        let catalog = MappingCatalog::new();
        match catalog.get("missing") {
            Err(StoreError::Unavailable(msg)) => assert!(msg.contains("missing")),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("lookup of unregistered mapping succeeded"),
        }
    }

    #[test]
    fn test_unregister() {
        let catalog = MappingCatalog::new();
        catalog
            .register("partition_map", Arc::new(MemoryMapping::new()))
            .unwrap();
        assert!(catalog.unregister("partition_map").unwrap().is_some());
        assert!(catalog.unregister("partition_map").unwrap().is_none());
        assert!(catalog.get("partition_map").is_err());
    }

    #[test]
    fn test_poisoned_lock_is_unavailable() {
        let catalog = Arc::new(MappingCatalog::new());
        let holder = Arc::clone(&catalog);
        let _ = thread::spawn(move || {
            let _guard = holder.mappings.write().unwrap();
            panic!("writer died holding the catalog lock");
        })
        .join();

        assert!(matches!(catalog.contains("partition_map"), Err(StoreError::Unavailable(_))));
        assert!(matches!(catalog.get("partition_map"), Err(StoreError::Unavailable(_))));
    }
}
