//! Shard lookups against a named mapping.

use super::{LookupContext, MappingError, MappingRegistry, MappingVersion, ShardId, ShardKey};
use crate::buckets::BucketId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Logical name of the bucket to shard mapping.
pub const DEFAULT_MAPPING_NAME: &str = "default.partition_map_dict";

/// Read-only client resolving shard keys through a registry.
///
/// The mapping is fetched from the registry on every call, so a mapping
/// re-registered or republished by its owner is picked up without
/// recreating the client.
#[derive(Clone)]
pub struct ShardMappingClient {
    registry: Arc<dyn MappingRegistry>,
    mapping_name: String,
}

impl ShardMappingClient {
    /// Creates a client for the mapping registered as `mapping_name`.
    pub fn new(registry: Arc<dyn MappingRegistry>, mapping_name: impl Into<String>) -> Self {
        Self {
            registry,
            mapping_name: mapping_name.into(),
        }
    }

    /// Creates a client for [`DEFAULT_MAPPING_NAME`].
    pub fn with_default_name(registry: Arc<dyn MappingRegistry>) -> Self {
        Self::new(registry, DEFAULT_MAPPING_NAME)
    }

    /// Returns the mapping name this client reads.
    pub fn mapping_name(&self) -> &str {
        &self.mapping_name
    }

    /// Resolves `(table, date, bucket)` under `version`.
    pub fn resolve_shard(
        &self,
        table: &str,
        date: u32,
        bucket: BucketId,
        version: &MappingVersion,
    ) -> Result<ShardId, MappingError> {
        self.resolve_key(&ShardKey::new(table, date, bucket), version)
    }

    /// Resolves a prepared key under `version`.
    ///
    /// # Returns
    /// The shard id, or an error carrying the full lookup context
    pub fn resolve_key(&self, key: &ShardKey, version: &MappingVersion) -> Result<ShardId, MappingError> {
        let context = || LookupContext {
            mapping: self.mapping_name.clone(),
            table: key.table().to_string(),
            date: key.date(),
            bucket: key.bucket(),
            version: version.clone(),
        };

        let mapping = self.registry.get(&self.mapping_name).map_err(|err| {
            let err = MappingError::from_store(err, context());
            warn!(error = %err, "shard mapping not loaded");
            err
        })?;

        let value = mapping.lookup(key, version.as_str()).map_err(|err| {
            let err = MappingError::from_store(err, context());
            warn!(error = %err, "shard mapping lookup failed");
            err
        })?;

        let value = match value {
            Some(value) if !value.is_empty() => value,
            _ => {
                let err = MappingError::ShardNotFound { context: context() };
                warn!(error = %err, "shard not found");
                return Err(err);
            }
        };

        let shard = value.parse::<ShardId>().map_err(|_| {
            let err = MappingError::ShardIdParseFailure {
                context: context(),
                value: value.clone(),
            };
            warn!(error = %err, "unparseable shard id");
            err
        })?;

        debug!(
            table = key.table(),
            date = key.date(),
            bucket = key.bucket().get(),
            version = version.as_str(),
            shard = shard.get(),
            "resolved shard"
        );
        Ok(shard)
    }
}
