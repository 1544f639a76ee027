//! The two routing entry points exposed to the query engine.

use super::args::parse_shard_args;
use super::{RouterConfig, RoutingContext};
use crate::buckets::{BucketBoundaries, BucketId};
use crate::hashing::{combine_with_policy, TypedValue};
use crate::mapping::{MappingRegistry, MappingVersion, ShardId, ShardMappingClient};
use crate::Result;
use std::sync::Arc;
use tracing::debug;

/// Routing façade: rows to buckets, buckets to shards.
///
/// Holds only immutable state plus a handle to the mapping client, so one
/// router can be shared by any number of threads.
#[derive(Clone)]
pub struct Router {
    boundaries: BucketBoundaries,
    client: ShardMappingClient,
    config: RouterConfig,
}

impl Router {
    /// Creates a router over `client`.
    pub fn new(client: ShardMappingClient, config: RouterConfig) -> Result<Self> {
        let boundaries = BucketBoundaries::with_max_hash(config.max_hash)?;
        Ok(Self {
            boundaries,
            client,
            config,
        })
    }

    /// Creates a router reading the default mapping name from `registry`.
    pub fn with_registry(registry: Arc<dyn MappingRegistry>, config: RouterConfig) -> Result<Self> {
        Self::new(ShardMappingClient::with_default_name(registry), config)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Returns the bucket boundaries.
    pub fn boundaries(&self) -> &BucketBoundaries {
        &self.boundaries
    }

    /// Returns the mapping client.
    pub fn client(&self) -> &ShardMappingClient {
        &self.client
    }

    /// Hashes a row and resolves its bucket.
    ///
    /// Any number of columns is accepted. Under the default policy columns of
    /// unsupported kinds are skipped and this never fails; under the strict
    /// policy they are rejected.
    pub fn compute_bucket(&self, columns: &[TypedValue]) -> Result<BucketId> {
        let code = combine_with_policy(columns, self.config.hash_policy)?;
        let bucket = self.boundaries.resolve(code);
        debug!(columns = columns.len(), hash = code, bucket = bucket.get(), "computed bucket");
        Ok(bucket)
    }

    /// Computes the bucket of every row in a batch.
    pub fn compute_buckets<I, R>(&self, rows: I) -> Result<Vec<BucketId>>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[TypedValue]>,
    {
        rows.into_iter()
            .map(|row| self.compute_bucket(row.as_ref()))
            .collect()
    }

    /// Resolves a shard under the configured default version.
    pub fn resolve_shard(&self, table: &str, date: u32, bucket: BucketId) -> Result<ShardId> {
        self.resolve_shard_with_version(table, date, bucket, &self.config.default_version)
    }

    /// Resolves a shard under an explicit mapping version.
    pub fn resolve_shard_with_version(
        &self,
        table: &str,
        date: u32,
        bucket: BucketId,
        version: &MappingVersion,
    ) -> Result<ShardId> {
        Ok(self.client.resolve_shard(table, date, bucket, version)?)
    }

    /// Resolves a shard using the query's pinned version when present.
    pub fn resolve_shard_in(
        &self,
        ctx: &RoutingContext,
        table: &str,
        date: u32,
        bucket: BucketId,
    ) -> Result<ShardId> {
        let version = self.active_version(ctx);
        self.resolve_shard_with_version(table, date, bucket, version)
    }

    /// Resolves a shard from positional engine arguments
    /// `(String table, UInt32 date, UInt32 range_id)`.
    ///
    /// Arity and types are checked before the mapping is touched.
    pub fn resolve_shard_args(&self, ctx: &RoutingContext, args: &[TypedValue]) -> Result<ShardId> {
        let args = parse_shard_args(args)?;
        self.resolve_shard_in(ctx, args.table, args.date, args.bucket)
    }

    /// The version a lookup under `ctx` reads.
    pub fn active_version<'a>(&'a self, ctx: &'a RoutingContext) -> &'a MappingVersion {
        match ctx.active_version() {
            Some(version) => {
                debug!(version = version.as_str(), "using query pinned mapping version");
                version
            }
            None => &self.config.default_version,
        }
    }
}
