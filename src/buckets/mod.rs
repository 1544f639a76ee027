//! Bucket resolver module.
//!
//! This module partitions the hash codomain into 16 ordered, contiguous
//! ranges. A hash code is assigned to the first range whose upper boundary
//! is greater than or equal to it, giving a stable 1-indexed bucket id that
//! sits between a hashed row and the shard mapping.

use thiserror::Error;

pub mod boundaries;
pub mod id;

/// Number of buckets the hash codomain is split into.
pub const BUCKET_COUNT: usize = 16;

/// Errors specific to the bucket layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketError {
    /// Codomain too small to hold 16 strictly ascending boundaries
    #[error("Invalid max hash {0}: must be at least {min}", min = boundaries::MIN_MAX_HASH)]
    InvalidMaxHash(u64),

    /// Bucket id outside of 1..=16
    #[error("Invalid bucket id {0}: must be between 1 and {max}", max = BUCKET_COUNT)]
    InvalidBucketId(u32),
}

// Re-export main types for public API
pub use boundaries::BucketBoundaries;
pub use id::BucketId;
