//! Validation of positional engine arguments.

use crate::buckets::BucketId;
use crate::hashing::{TypedValue, ValueKind};
use thiserror::Error;
use tracing::warn;

/// Errors for engine arguments that break the routing call contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// Wrong number of arguments
    #[error("Number of arguments doesn't match: passed {found}, should be {expected}")]
    ArgumentCountMismatch { expected: usize, found: usize },

    /// Argument of the wrong type
    #[error("argument {position} '{name}' must be of type {expected}, got {found}")]
    InvalidArgumentType {
        position: usize,
        name: &'static str,
        expected: ValueKind,
        found: ValueKind,
    },

    /// Range id outside of 1..=16
    #[error("argument {position} 'range_id' must be between 1 and 16, got {value}")]
    BucketOutOfRange { position: usize, value: u32 },
}

/// Arguments of a shard resolution call: `(table, date, range_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardArgs<'a> {
    pub table: &'a str,
    pub date: u32,
    pub bucket: BucketId,
}

const SHARD_ARITY: usize = 3;

fn type_error(position: usize, name: &'static str, expected: ValueKind, found: &TypedValue) -> ArgumentError {
    let err = ArgumentError::InvalidArgumentType {
        position,
        name,
        expected,
        found: found.kind(),
    };
    warn!(error = %err, "rejecting shard resolution arguments");
    err
}

fn range_error(position: usize, value: u32) -> ArgumentError {
    let err = ArgumentError::BucketOutOfRange { position, value };
    warn!(error = %err, "rejecting shard resolution arguments");
    err
}

/// Checks arity and types of `(String table, UInt32 date, UInt32 range_id)`.
///
/// Runs before any mapping lookup.
pub fn parse_shard_args(args: &[TypedValue]) -> Result<ShardArgs<'_>, ArgumentError> {
    let [table, date, range_id] = args else {
        let err = ArgumentError::ArgumentCountMismatch {
            expected: SHARD_ARITY,
            found: args.len(),
        };
        warn!(error = %err, "rejecting shard resolution arguments");
        return Err(err);
    };

    let table = table
        .as_str()
        .ok_or_else(|| type_error(0, "table", ValueKind::String, table))?;
    let date = date
        .as_u32()
        .ok_or_else(|| type_error(1, "date", ValueKind::UInt32, date))?;
    let value = range_id
        .as_u32()
        .ok_or_else(|| type_error(2, "range_id", ValueKind::UInt32, range_id))?;
    let bucket = BucketId::new(value).map_err(|_| range_error(2, value))?;

    Ok(ShardArgs { table, date, bucket })
}
