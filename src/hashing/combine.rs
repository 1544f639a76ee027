//! Order-sensitive hash combining over a row of typed values.
//!
//! The combiner starts from a zero seed and mixes every hashable column into
//! it in argument order:
//!
//! `seed ^= hash(value) + 0x9e3779b9 + (seed << 6) + (seed >> 2)`
//!
//! with wrapping arithmetic on a 64-bit seed. Integer kinds hash to their
//! value widened to 64 bits (signed kinds sign-extend), strings hash with
//! xxh3. Both the constant and the shift widths are fixed: bucket
//! assignments already computed elsewhere depend on them.

use super::value::{is_hashable, TypedValue};
use super::HashError;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

/// Combined hash of a row.
pub type HashCode = u64;

/// Golden-ratio mixing constant.
pub const GOLDEN_RATIO: u64 = 0x9e37_79b9;

/// What to do with columns whose kind is not hashable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashPolicy {
    /// Skip the column; it contributes nothing to the seed.
    #[default]
    SkipUnsupported,
    /// Reject the row with [`HashError::UnsupportedKind`].
    Strict,
}

/// Mixes one scalar hash into the seed.
#[inline]
pub fn mix(seed: HashCode, value_hash: HashCode) -> HashCode {
    seed ^ value_hash
        .wrapping_add(GOLDEN_RATIO)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

/// Scalar hash of a value. Only called for kinds passing [`is_hashable`].
fn scalar_hash(value: &TypedValue) -> Option<HashCode> {
    match value {
        TypedValue::UInt8(v) => Some(u64::from(*v)),
        TypedValue::Int8(v) => Some(i64::from(*v) as u64),
        TypedValue::Int64(v) => Some(*v as u64),
        TypedValue::String(v) => Some(xxh3_64(v.as_bytes())),
        _ => None,
    }
}

/// Combines a row into a hash code, skipping unsupported kinds.
///
/// Rows that differ only in unsupported columns hash identically.
pub fn combine(values: &[TypedValue]) -> HashCode {
    values.iter().enumerate().fold(0, |seed, (position, value)| {
        let hashed = if is_hashable(value.kind()) {
            scalar_hash(value)
        } else {
            None
        };
        match hashed {
            Some(h) => {
                let next = mix(seed, h);
                debug!(position, kind = %value.kind(), hash = next, "hashed column");
                next
            }
            None => {
                debug!(position, kind = %value.kind(), "skipping column");
                seed
            }
        }
    })
}

/// Combines a row under the given policy.
///
/// # Returns
/// The combined hash, or an error naming the first unsupported column when
/// the policy is [`HashPolicy::Strict`]
pub fn combine_with_policy(values: &[TypedValue], policy: HashPolicy) -> Result<HashCode, HashError> {
    if policy == HashPolicy::Strict {
        if let Some((position, value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !is_hashable(v.kind()))
        {
            return Err(HashError::UnsupportedKind {
                position,
                kind: value.kind(),
            });
        }
    }
    Ok(combine(values))
}
