//! Persistent mapping store backed by redb.
//!
//! Each version label gets its own table named `<mapping>::<version>`:
//!
//! Key:   (table, date as decimal text, bucket)
//! Value: shard id as text
//!
//! Lookups run in a fresh read transaction, so they see the last committed
//! generation of a version and never a half-written one. Publishing a
//! version rewrites its table inside a single write transaction.
//!
//! A counter table named `<mapping>.generation` is bumped in the same
//! transaction as every publish or removal.

use super::{CompositeKeyLookup, MappingVersion, ShardKey, StoreError};
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition, TableError,
    WriteTransaction,
};
use std::path::Path;
use tracing::debug;

type MappingKey = (&'static str, &'static str, u32);

const GENERATION_KEY: &str = "generation";

/// Composite-key mapping stored in a redb database.
pub struct RedbMapping {
    db: Database,
    name: String,
}

impl RedbMapping {
    /// Creates (or opens) the mapping database at `path`.
    ///
    /// # Arguments
    /// * `path` - Database file location
    /// * `name` - Logical mapping name, used as the table name prefix
    pub fn create(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self, StoreError> {
        let db = Database::create(path.as_ref()).map_err(|err| {
            StoreError::Unavailable(format!("{}: {}", path.as_ref().display(), err))
        })?;
        Ok(Self::from_database(db, name))
    }

    /// Opens an existing mapping database at `path`.
    pub fn open(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self, StoreError> {
        let db = Database::open(path.as_ref()).map_err(|err| {
            StoreError::Unavailable(format!("{}: {}", path.as_ref().display(), err))
        })?;
        Ok(Self::from_database(db, name))
    }

    /// Wraps an already opened database.
    pub fn from_database(db: Database, name: impl Into<String>) -> Self {
        Self {
            db,
            name: name.into(),
        }
    }

    /// Returns the logical mapping name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Table name holding the entries of `version`.
    pub fn table_name(&self, version: &str) -> String {
        format!("{}::{}", self.name, version)
    }

    fn generation_table_name(&self) -> String {
        format!("{}.generation", self.name)
    }

    /// Number of committed publishes and removals; 0 for a fresh database.
    pub fn generation(&self) -> Result<u64, StoreError> {
        let table_name = self.generation_table_name();
        let definition: TableDefinition<&str, u64> = TableDefinition::new(&table_name);
        let read_txn = self
            .db
            .begin_read()
            .map_err(|err| StoreError::Unavailable(format!("{}: {}", table_name, err)))?;
        let table = match read_txn.open_table(definition) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(0),
            Err(err) => return Err(open_error(&table_name, err)),
        };
        let value = table
            .get(GENERATION_KEY)
            .map_err(|err| StoreError::Unavailable(format!("{}: {}", table_name, err)))?;
        Ok(value.map(|guard| guard.value()).unwrap_or(0))
    }

    fn bump_generation(&self, write_txn: &WriteTransaction) -> Result<u64, StoreError> {
        let table_name = self.generation_table_name();
        let definition: TableDefinition<&str, u64> = TableDefinition::new(&table_name);
        let bump_err = |err: &dyn std::fmt::Display| {
            StoreError::PublishFailed(format!("{}: {}", table_name, err))
        };

        let mut table = write_txn
            .open_table(definition)
            .map_err(|err| bump_err(&err))?;
        let current = table
            .get(GENERATION_KEY)
            .map_err(|err| bump_err(&err))?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table
            .insert(GENERATION_KEY, next)
            .map_err(|err| bump_err(&err))?;
        Ok(next)
    }

    /// Replaces every entry of `version` with `entries` atomically.
    ///
    /// Concurrent lookups keep seeing the previous contents until the write
    /// transaction commits. A key supplied more than once keeps its last
    /// shard.
    ///
    /// # Returns
    /// Number of distinct entries stored for `version`
    pub fn publish_version<I, S>(&self, version: &MappingVersion, entries: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = (ShardKey, S)>,
        S: AsRef<str>,
    {
        let table_name = self.table_name(version.as_str());
        let definition: TableDefinition<MappingKey, &str> = TableDefinition::new(&table_name);
        let publish_err = |err: &dyn std::fmt::Display| {
            StoreError::PublishFailed(format!("{}: {}", table_name, err))
        };

        let write_txn = self.db.begin_write().map_err(|err| publish_err(&err))?;
        write_txn
            .delete_table(definition)
            .map_err(|err| publish_err(&err))?;

        let stored = {
            let mut table = write_txn
                .open_table(definition)
                .map_err(|err| publish_err(&err))?;
            for (key, shard) in entries {
                let date = key.date_key();
                table
                    .insert((key.table(), date.as_str(), key.bucket().get()), shard.as_ref())
                    .map_err(|err| publish_err(&err))?;
            }
            table.len().map_err(|err| publish_err(&err))?
        };
        let generation = self.bump_generation(&write_txn)?;

        write_txn.commit().map_err(|err| publish_err(&err))?;
        debug!(table = %table_name, entries = stored, generation, "published mapping version");
        Ok(stored as usize)
    }

    /// Drops all entries of `version`.
    ///
    /// # Returns
    /// true if the version existed
    pub fn remove_version(&self, version: &MappingVersion) -> Result<bool, StoreError> {
        let table_name = self.table_name(version.as_str());
        let definition: TableDefinition<MappingKey, &str> = TableDefinition::new(&table_name);
        let write_txn = self
            .db
            .begin_write()
            .map_err(|err| StoreError::PublishFailed(format!("{}: {}", table_name, err)))?;
        let existed = write_txn
            .delete_table(definition)
            .map_err(|err| StoreError::PublishFailed(format!("{}: {}", table_name, err)))?;
        if existed {
            self.bump_generation(&write_txn)?;
        }
        write_txn
            .commit()
            .map_err(|err| StoreError::PublishFailed(format!("{}: {}", table_name, err)))?;
        Ok(existed)
    }

    /// Number of entries stored for `version`; 0 if the version is absent.
    pub fn version_len(&self, version: &MappingVersion) -> Result<u64, StoreError> {
        let table_name = self.table_name(version.as_str());
        let definition: TableDefinition<MappingKey, &str> = TableDefinition::new(&table_name);
        let read_txn = self
            .db
            .begin_read()
            .map_err(|err| StoreError::Unavailable(format!("{}: {}", table_name, err)))?;
        match read_txn.open_table(definition) {
            Ok(table) => table
                .len()
                .map_err(|err| StoreError::Unavailable(format!("{}: {}", table_name, err))),
            Err(TableError::TableDoesNotExist(_)) => Ok(0),
            Err(err) => Err(open_error(&table_name, err)),
        }
    }
}

fn open_error(table_name: &str, err: TableError) -> StoreError {
    match err {
        TableError::TableTypeMismatch { .. } | TableError::TableIsMultimap(_) => {
            StoreError::TypeMismatch(format!("{}: {}", table_name, err))
        }
        other => StoreError::Unavailable(format!("{}: {}", table_name, other)),
    }
}

impl CompositeKeyLookup for RedbMapping {
    fn lookup(&self, key: &ShardKey, attribute: &str) -> Result<Option<String>, StoreError> {
        let table_name = self.table_name(attribute);
        let definition: TableDefinition<MappingKey, &str> = TableDefinition::new(&table_name);
        let read_txn = self
            .db
            .begin_read()
            .map_err(|err| StoreError::Unavailable(format!("{}: {}", table_name, err)))?;

        let table = match read_txn.open_table(definition) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(err) => return Err(open_error(&table_name, err)),
        };

        let date = key.date_key();
        let value = table
            .get((key.table(), date.as_str(), key.bucket().get()))
            .map_err(|err| StoreError::Unavailable(format!("{}: {}", table_name, err)))?;
        Ok(value.map(|guard| guard.value().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::BucketId;
    use tempfile::NamedTempFile;

    fn key(bucket: u32) -> ShardKey {
        ShardKey::new("orders", 20230101, BucketId::new(bucket).unwrap())
    }

    fn version(label: &str) -> MappingVersion {
        MappingVersion::new(label).unwrap()
    }

    #[test]
    fn test_publish_and_lookup() {
        let temp_file = NamedTempFile::new().unwrap();
        let mapping = RedbMapping::create(temp_file.path(), "partition_map").unwrap();

        let written = mapping
            .publish_version(&version("A"), vec![(key(7), "3"), (key(8), "4")])
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(mapping.version_len(&version("A")).unwrap(), 2);

        assert_eq!(mapping.lookup(&key(7), "A").unwrap(), Some("3".to_string()));
        assert_eq!(mapping.lookup(&key(8), "A").unwrap(), Some("4".to_string()));
        assert_eq!(mapping.lookup(&key(9), "A").unwrap(), None);
    }

    #[test]
    fn test_duplicate_keys_count_once() {
        let temp_file = NamedTempFile::new().unwrap();
        let mapping = RedbMapping::create(temp_file.path(), "partition_map").unwrap();

        let stored = mapping
            .publish_version(&version("A"), vec![(key(7), "3"), (key(7), "4"), (key(8), "5")])
            .unwrap();
        assert_eq!(stored, 2);
        assert_eq!(mapping.version_len(&version("A")).unwrap(), 2);
        assert_eq!(mapping.lookup(&key(7), "A").unwrap(), Some("4".to_string()));
    }

    #[test]
    fn test_generation_tracks_commits() {
        let temp_file = NamedTempFile::new().unwrap();
        let mapping = RedbMapping::create(temp_file.path(), "partition_map").unwrap();
        assert_eq!(mapping.generation().unwrap(), 0);

        mapping
            .publish_version(&version("A"), vec![(key(7), "3")])
            .unwrap();
        mapping
            .publish_version(&version("B"), vec![(key(7), "4")])
            .unwrap();
        assert_eq!(mapping.generation().unwrap(), 2);

        for _ in 0..5 {
            assert_eq!(mapping.lookup(&key(7), "A").unwrap(), Some("3".to_string()));
        }
        assert_eq!(mapping.generation().unwrap(), 2);

        assert!(mapping.remove_version(&version("B")).unwrap());
        assert!(!mapping.remove_version(&version("B")).unwrap());
        assert_eq!(mapping.generation().unwrap(), 3);
    }

    #[test]
    fn test_missing_version_is_absent() {
        let temp_file = NamedTempFile::new().unwrap();
        let mapping = RedbMapping::create(temp_file.path(), "partition_map").unwrap();
        mapping
            .publish_version(&version("A"), vec![(key(7), "3")])
            .unwrap();

        assert_eq!(mapping.lookup(&key(7), "B").unwrap(), None);
        assert_eq!(mapping.version_len(&version("B")).unwrap(), 0);
    }

    #[test]
    fn test_publish_replaces_previous_entries() {
        let temp_file = NamedTempFile::new().unwrap();
        let mapping = RedbMapping::create(temp_file.path(), "partition_map").unwrap();

        mapping
            .publish_version(&version("A"), vec![(key(1), "1"), (key(2), "2")])
            .unwrap();
        mapping
            .publish_version(&version("A"), vec![(key(2), "7")])
            .unwrap();

        assert_eq!(mapping.lookup(&key(1), "A").unwrap(), None);
        assert_eq!(mapping.lookup(&key(2), "A").unwrap(), Some("7".to_string()));
        assert_eq!(mapping.version_len(&version("A")).unwrap(), 1);
    }

    #[test]
    fn test_versions_are_independent() {
        let temp_file = NamedTempFile::new().unwrap();
        let mapping = RedbMapping::create(temp_file.path(), "partition_map").unwrap();

        mapping
            .publish_version(&version("A"), vec![(key(5), "1")])
            .unwrap();
        mapping
            .publish_version(&version("B"), vec![(key(5), "2")])
            .unwrap();

        assert_eq!(mapping.lookup(&key(5), "A").unwrap(), Some("1".to_string()));
        assert_eq!(mapping.lookup(&key(5), "B").unwrap(), Some("2".to_string()));

        assert!(mapping.remove_version(&version("A")).unwrap());
        assert!(!mapping.remove_version(&version("A")).unwrap());
        assert_eq!(mapping.lookup(&key(5), "A").unwrap(), None);
        assert_eq!(mapping.lookup(&key(5), "B").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_wrong_table_type_is_type_mismatch() {
        let temp_file = NamedTempFile::new().unwrap();
        let mapping = RedbMapping::create(temp_file.path(), "partition_map").unwrap();

        // A flat u64 -> u64 table squatting on the version table name
        let squatter: TableDefinition<u64, u64> = TableDefinition::new("partition_map::A");
        let write_txn = mapping.database().begin_write().unwrap();
        {
            let mut table = write_txn.open_table(squatter).unwrap();
            table.insert(1u64, 2u64).unwrap();
        }
        write_txn.commit().unwrap();

        match mapping.lookup(&key(7), "A") {
            Err(StoreError::TypeMismatch(msg)) => assert!(msg.contains("partition_map::A")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_reopen_keeps_entries() {
        let temp_file = NamedTempFile::new().unwrap();
        {
            let mapping = RedbMapping::create(temp_file.path(), "partition_map").unwrap();
            mapping
                .publish_version(&version("A"), vec![(key(7), "3")])
                .unwrap();
        }

        let mapping = RedbMapping::open(temp_file.path(), "partition_map").unwrap();
        assert_eq!(mapping.name(), "partition_map");
        assert_eq!(mapping.lookup(&key(7), "A").unwrap(), Some("3".to_string()));
    }
}
