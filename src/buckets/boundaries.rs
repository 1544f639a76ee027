//! Static range boundaries over the hash codomain.
//!
//! For a codomain `[0, max]` the boundaries are:
//!
//! ```text
//! unit = (max - 15) / 16
//! b[i] = unit * (i + 1) + i     for i in 0..15
//! b[15] = max
//! ```
//!
//! Consecutive boundaries step by `unit + 1`. For the full 64-bit codomain
//! this gives 16 ranges of exactly 2^60 codes each. The formula is kept as is
//! since previously assigned buckets depend on the exact values.

use super::{BucketError, BucketId, BUCKET_COUNT};
use crate::hashing::HashCode;
use std::ops::RangeInclusive;

/// Smallest codomain maximum that still yields strictly ascending boundaries.
pub const MIN_MAX_HASH: u64 = BUCKET_COUNT as u64 - 1;

/// Immutable, ascending upper boundaries of the 16 buckets.
///
/// Built once and then only read, so a single value can be shared across
/// threads without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketBoundaries {
    bounds: [HashCode; BUCKET_COUNT],
}

impl BucketBoundaries {
    /// Creates the boundaries over the full 64-bit codomain.
    pub fn new() -> Self {
        Self::build(u64::MAX)
    }

    /// Creates the boundaries over `[0, max_hash]`.
    ///
    /// # Arguments
    /// * `max_hash` - Largest hash code (must be >= 15)
    ///
    /// # Returns
    /// Validated boundaries or error if the codomain is too small
    pub fn with_max_hash(max_hash: u64) -> Result<Self, BucketError> {
        if max_hash < MIN_MAX_HASH {
            return Err(BucketError::InvalidMaxHash(max_hash));
        }
        Ok(Self::build(max_hash))
    }

    fn build(max_hash: u64) -> Self {
        let unit = (max_hash - MIN_MAX_HASH) / BUCKET_COUNT as u64;
        let mut bounds = [max_hash; BUCKET_COUNT];
        for (i, bound) in bounds.iter_mut().take(BUCKET_COUNT - 1).enumerate() {
            let i = i as u64;
            *bound = unit * (i + 1) + i;
        }
        Self { bounds }
    }

    /// Resolves a hash code to its bucket.
    ///
    /// Lower-bound search: the bucket is the first boundary >= `code`.
    /// Codes above the configured maximum land in the last bucket.
    pub fn resolve(&self, code: HashCode) -> BucketId {
        let index = self.bounds.partition_point(|bound| *bound < code);
        BucketId::from_index(index.min(BUCKET_COUNT - 1))
    }

    /// Returns the boundaries in ascending order.
    pub fn as_slice(&self) -> &[HashCode] {
        &self.bounds
    }

    /// Returns the largest hash code of the codomain.
    pub fn max_hash(&self) -> HashCode {
        self.bounds[BUCKET_COUNT - 1]
    }

    /// Returns the inclusive range of hash codes assigned to `bucket`.
    pub fn range(&self, bucket: BucketId) -> RangeInclusive<HashCode> {
        let index = bucket.index();
        let start = if index == 0 {
            0
        } else {
            self.bounds[index - 1] + 1
        };
        start..=self.bounds[index]
    }
}

impl Default for BucketBoundaries {
    fn default() -> Self {
        Self::new()
    }
}
