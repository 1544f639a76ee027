//! Key and value types of the shard mapping.

use crate::buckets::BucketId;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Composite key of the mapping: table name, partition date and bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShardKey {
    table: String,
    date: u32,
    bucket: BucketId,
}

impl ShardKey {
    /// Creates a new key.
    pub fn new(table: impl Into<String>, date: u32, bucket: BucketId) -> Self {
        Self {
            table: table.into(),
            date,
            bucket,
        }
    }

    /// Table name component.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Partition date as a day code.
    pub fn date(&self) -> u32 {
        self.date
    }

    /// Partition date the way the mapping stores it: decimal text.
    pub fn date_key(&self) -> String {
        self.date.to_string()
    }

    /// Bucket component.
    pub fn bucket(&self) -> BucketId {
        self.bucket
    }
}

impl fmt::Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.table, self.date, self.bucket)
    }
}

/// Label of one generation of the bucket to shard table, e.g. `"A"`.
///
/// The label doubles as the attribute name queried in the mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingVersion(String);

impl MappingVersion {
    /// Creates a version label. Blank labels are rejected.
    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(Error::InvalidInput(
                "mapping version label must not be empty".to_string(),
            ));
        }
        Ok(Self(label))
    }

    /// Returns the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MappingVersion {
    fn default() -> Self {
        Self("A".to_string())
    }
}

impl FromStr for MappingVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MappingVersion::new(s)
    }
}

impl fmt::Display for MappingVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Physical shard identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShardId(pub u32);

impl ShardId {
    /// Returns the numeric id.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl FromStr for ShardId {
    type Err = std::num::ParseIntError;

    /// Parses the textual form stored in the mapping. Surrounding whitespace
    /// is ignored; anything else must be a plain unsigned integer.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(ShardId)
    }
}

impl From<ShardId> for u32 {
    fn from(id: ShardId) -> Self {
        id.0
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
