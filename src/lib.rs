//! Consistent-hash shard routing.
//!
//! A row's partition columns are folded into a 64-bit hash, the hash picks
//! one of 16 fixed buckets, and `(table, date, bucket)` is looked up in an
//! externally maintained mapping to find the shard. Resharding changes the
//! mapping, never the hash, so only the moved buckets change shard.

pub mod buckets;
pub mod error;
pub mod hashing;
pub mod mapping;
pub mod routing;

// Re-export common types for convenience
pub use buckets::{BucketBoundaries, BucketId};
pub use error::{Error, Result};
pub use hashing::{combine, HashPolicy, TypedValue, ValueKind};
pub use mapping::{
    CompositeKeyLookup, MappingCatalog, MappingRegistry, MappingVersion, ShardId, ShardKey,
    ShardMappingClient,
};
pub use routing::{Router, RouterConfig, RoutingContext};
