//! In-process mapping store with whole-generation swaps.

use super::{CompositeKeyLookup, ShardKey, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

type EntryKey = (String, String, u32);

/// Contents of one mapping generation: key -> attribute -> value.
#[derive(Debug, Clone, Default)]
pub struct MappingSnapshot {
    entries: HashMap<EntryKey, HashMap<String, String>>,
}

impl MappingSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `attribute` of `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: &ShardKey, attribute: &str, value: impl Into<String>) {
        self.entries
            .entry(entry_key(key))
            .or_default()
            .insert(attribute.to_string(), value.into());
    }

    /// Builder form of [`MappingSnapshot::insert`].
    pub fn with_entry(mut self, key: &ShardKey, attribute: &str, value: impl Into<String>) -> Self {
        self.insert(key, attribute, value);
        self
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, key: &ShardKey, attribute: &str) -> Option<&String> {
        self.entries.get(&entry_key(key))?.get(attribute)
    }
}

fn entry_key(key: &ShardKey) -> EntryKey {
    (key.table().to_string(), key.date_key(), key.bucket().get())
}

struct Generation {
    number: u64,
    snapshot: MappingSnapshot,
}

/// Mapping held in memory and replaced one generation at a time.
///
/// Readers clone the current `Arc` and release the lock before looking up,
/// so a publish never blocks behind a lookup and a lookup never sees a
/// partially written generation.
pub struct MemoryMapping {
    current: RwLock<Arc<Generation>>,
}

impl MemoryMapping {
    /// Creates an empty mapping at generation 0.
    pub fn new() -> Self {
        Self::from_snapshot(MappingSnapshot::new())
    }

    /// Creates a mapping whose generation 0 is `snapshot`.
    pub fn from_snapshot(snapshot: MappingSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(Generation {
                number: 0,
                snapshot,
            })),
        }
    }

    /// Replaces the whole mapping with `snapshot`.
    ///
    /// # Returns
    /// The new generation number
    pub fn publish(&self, snapshot: MappingSnapshot) -> Result<u64, StoreError> {
        let mut current = self
            .current
            .write()
            .map_err(|_| StoreError::PublishFailed("mapping lock poisoned".to_string()))?;
        let number = current.number + 1;
        debug!(generation = number, keys = snapshot.len(), "publishing mapping generation");
        *current = Arc::new(Generation { number, snapshot });
        Ok(number)
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> Result<u64, StoreError> {
        Ok(self.load()?.number)
    }

    fn load(&self) -> Result<Arc<Generation>, StoreError> {
        self.current
            .read()
            .map(|guard| Arc::clone(&*guard))
            .map_err(|_| StoreError::Unavailable("mapping lock poisoned".to_string()))
    }
}

impl Default for MemoryMapping {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeKeyLookup for MemoryMapping {
    fn lookup(&self, key: &ShardKey, attribute: &str) -> Result<Option<String>, StoreError> {
        let generation = self.load()?;
        Ok(generation.snapshot.get(key, attribute).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::BucketId;

    fn key(bucket: u32) -> ShardKey {
        ShardKey::new("orders", 20230101, BucketId::new(bucket).unwrap())
    }

    #[test]
    fn test_lookup_attribute() {
        let mapping = MemoryMapping::from_snapshot(
            MappingSnapshot::new()
                .with_entry(&key(7), "A", "3")
                .with_entry(&key(7), "B", "5"),
        );

        assert_eq!(mapping.lookup(&key(7), "A").unwrap(), Some("3".to_string()));
        assert_eq!(mapping.lookup(&key(7), "B").unwrap(), Some("5".to_string()));
        assert_eq!(mapping.lookup(&key(7), "C").unwrap(), None);
        assert_eq!(mapping.lookup(&key(8), "A").unwrap(), None);
    }

    #[test]
    fn test_publish_replaces_generation() {
        let mapping = MemoryMapping::from_snapshot(MappingSnapshot::new().with_entry(&key(1), "A", "1"));
        assert_eq!(mapping.generation().unwrap(), 0);

        let generation = mapping
            .publish(MappingSnapshot::new().with_entry(&key(2), "A", "9"))
            .unwrap();
        assert_eq!(generation, 1);
        assert_eq!(mapping.generation().unwrap(), 1);

        // Old keys are gone, not merged
        assert_eq!(mapping.lookup(&key(1), "A").unwrap(), None);
        assert_eq!(mapping.lookup(&key(2), "A").unwrap(), Some("9".to_string()));
    }

    #[test]
    fn test_snapshot_insert_overwrites() {
        let mut snapshot = MappingSnapshot::new();
        assert!(snapshot.is_empty());
        snapshot.insert(&key(3), "A", "1");
        snapshot.insert(&key(3), "A", "2");
        assert_eq!(snapshot.len(), 1);

        let mapping = MemoryMapping::from_snapshot(snapshot);
        assert_eq!(mapping.lookup(&key(3), "A").unwrap(), Some("2".to_string()));
    }
}
