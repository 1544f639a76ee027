//! Bucket identifier.

use super::{BucketError, BUCKET_COUNT};
use std::fmt;

/// A 1-indexed bucket id, always in `1..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketId(u32);

impl BucketId {
    /// Lowest bucket id.
    pub const MIN: BucketId = BucketId(1);

    /// Highest bucket id.
    pub const MAX: BucketId = BucketId(BUCKET_COUNT as u32);

    /// Creates a bucket id, validating the range.
    pub fn new(id: u32) -> Result<Self, BucketError> {
        if id == 0 || id > BUCKET_COUNT as u32 {
            return Err(BucketError::InvalidBucketId(id));
        }
        Ok(Self(id))
    }

    /// Builds the id for a 0-based boundary index. Callers guarantee the range.
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < BUCKET_COUNT);
        Self(index as u32 + 1)
    }

    /// Returns the 1-indexed id.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Returns the 0-based position of this bucket.
    pub fn index(&self) -> usize {
        self.0 as usize - 1
    }

    /// Iterates over all bucket ids in ascending order.
    pub fn all() -> impl Iterator<Item = BucketId> {
        (0..BUCKET_COUNT).map(BucketId::from_index)
    }
}

impl TryFrom<u32> for BucketId {
    type Error = BucketError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        BucketId::new(id)
    }
}

impl From<BucketId> for u32 {
    fn from(id: BucketId) -> Self {
        id.0
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
