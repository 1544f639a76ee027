//! Shard mapping module.
//!
//! Resolves `(table, date, bucket)` to a shard id through an externally
//! maintained, hot-reloadable mapping. The mapping is only ever read here:
//! stores implement [`CompositeKeyLookup`], a registry hands them out by
//! name, and [`ShardMappingClient`] turns a lookup into a [`ShardId`] or an
//! error that carries the full lookup context.

use crate::buckets::BucketId;
use std::fmt;
use thiserror::Error;

pub mod catalog;
pub mod client;
pub mod memory;
pub mod redb_store;
pub mod traits;
pub mod types;

// Re-export main types for public API
pub use catalog::MappingCatalog;
pub use client::{ShardMappingClient, DEFAULT_MAPPING_NAME};
pub use memory::{MappingSnapshot, MemoryMapping};
pub use redb_store::RedbMapping;
pub use traits::{CompositeKeyLookup, MappingRegistry};
pub use types::{MappingVersion, ShardId, ShardKey};

/// Failures reported by a mapping store or registry, before any routing
/// context is attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The mapping cannot be located or loaded
    #[error("mapping unavailable: {0}")]
    Unavailable(String),

    /// The mapping exists but is not a composite-key string table
    #[error("mapping type mismatch: {0}")]
    TypeMismatch(String),

    /// Writing a new mapping generation failed
    #[error("mapping publish failed: {0}")]
    PublishFailed(String),
}

/// Everything needed to reproduce a shard lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupContext {
    pub mapping: String,
    pub table: String,
    pub date: u32,
    pub bucket: BucketId,
    pub version: MappingVersion,
}

impl fmt::Display for LookupContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table: {}, date: {}, bucket: {}, version: {}",
            self.table, self.date, self.bucket, self.version
        )
    }
}

/// Errors specific to shard resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The named mapping cannot be located or loaded
    #[error("Shard not found as mapping {} can't be loaded for {context}: {reason}", .context.mapping)]
    MappingUnavailable {
        context: LookupContext,
        reason: String,
    },

    /// The mapping is loaded but has the wrong structure
    #[error("Shard not found as mapping {} is not a composite-key table for {context}: {reason}", .context.mapping)]
    MappingTypeMismatch {
        context: LookupContext,
        reason: String,
    },

    /// No entry for the key under the requested version
    #[error("Shard not found in mapping {} for {context}", .context.mapping)]
    ShardNotFound { context: LookupContext },

    /// The stored shard id is not a non-negative integer
    #[error("Invalid shard id {value:?} in mapping {} for {context}", .context.mapping)]
    ShardIdParseFailure {
        context: LookupContext,
        value: String,
    },
}

impl MappingError {
    /// Returns the lookup that failed.
    pub fn context(&self) -> &LookupContext {
        match self {
            MappingError::MappingUnavailable { context, .. }
            | MappingError::MappingTypeMismatch { context, .. }
            | MappingError::ShardNotFound { context }
            | MappingError::ShardIdParseFailure { context, .. } => context,
        }
    }

    /// True for failures of the mapping infrastructure rather than its data.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            MappingError::MappingUnavailable { .. } | MappingError::MappingTypeMismatch { .. }
        )
    }

    pub(crate) fn from_store(err: StoreError, context: LookupContext) -> Self {
        match err {
            StoreError::TypeMismatch(reason) => MappingError::MappingTypeMismatch { context, reason },
            StoreError::Unavailable(reason) | StoreError::PublishFailed(reason) => {
                MappingError::MappingUnavailable { context, reason }
            }
        }
    }
}
