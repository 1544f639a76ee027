//! Value combiner module.
//!
//! Folds an ordered row of typed column values into a single hash code.
//! Only a closed set of scalar kinds takes part in hashing; the rest are
//! skipped, or rejected when the strict policy is selected.

use thiserror::Error;

pub mod combine;
pub mod value;

// Re-export main types for public API
pub use combine::{combine, combine_with_policy, mix, HashCode, HashPolicy, GOLDEN_RATIO};
pub use value::{is_hashable, TypedValue, ValueKind};

/// Errors specific to the value combiner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// A column of a kind outside the hashable set under the strict policy
    #[error("column {position} has unsupported kind {kind} for hashing")]
    UnsupportedKind { position: usize, kind: ValueKind },
}
