//! Crate-scoped error handling for redb-shard-router.
//!
//! This module provides a unified error type for public APIs while keeping
//! the precise per-layer error available for matching and diagnostics.

use thiserror::Error as ThisError;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type exposed to users of the crate.
///
/// Each variant wraps the error of one routing layer, so callers can match
/// on the layer first and on the precise failure second.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Errors from the value combiner (strict hashing only)
    #[error("Hash error: {0}")]
    Hash(#[from] crate::hashing::HashError),

    /// Errors from the bucket layer (boundary construction, bucket ids)
    #[error("Bucket error: {0}")]
    Bucket(#[from] crate::buckets::BucketError),

    /// Errors from the shard mapping client
    #[error("Mapping error: {0}")]
    Mapping(#[from] crate::mapping::MappingError),

    /// Errors from a mapping store outside of a shard lookup
    #[error("Store error: {0}")]
    Store(#[from] crate::mapping::StoreError),

    /// Engine arguments that violate the routing call contract
    #[error("Argument error: {0}")]
    Argument(#[from] crate::routing::ArgumentError),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True when the failure came from the external mapping infrastructure.
    ///
    /// These are the only errors worth retrying; the retry policy itself
    /// belongs to the caller.
    pub fn is_infrastructure(&self) -> bool {
        match self {
            Error::Mapping(err) => err.is_infrastructure(),
            Error::Store(_) => true,
            _ => false,
        }
    }

    /// True when the mapping answered but its data is incomplete or malformed.
    pub fn is_data(&self) -> bool {
        matches!(self, Error::Mapping(err) if !err.is_infrastructure())
    }
}
