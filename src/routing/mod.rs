//! Routing façade module.
//!
//! Exposes the two calls the query engine makes: hashing a row to a bucket
//! at write time, and resolving `(table, date, bucket)` to a shard at
//! dispatch time. The two are independent apart from the bucket value that
//! flows between them.

pub mod args;
pub mod config;
pub mod context;
pub mod router;

// Re-export main types for public API
pub use args::{parse_shard_args, ArgumentError, ShardArgs};
pub use config::RouterConfig;
pub use context::RoutingContext;
pub use router::Router;
