//! Configuration for the routing façade.

use crate::buckets::BucketBoundaries;
use crate::hashing::HashPolicy;
use crate::mapping::MappingVersion;

/// Configuration for a [`Router`](super::Router).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Mapping version used when the caller's context does not name one
    pub default_version: MappingVersion,

    /// Handling of columns that are not hashable
    ///
    /// `SkipUnsupported` keeps existing bucket assignments stable.
    /// `Strict` refuses rows containing such columns.
    pub hash_policy: HashPolicy,

    /// Largest hash code of the bucketed codomain
    ///
    /// Must be at least 15. Anything other than `u64::MAX` changes bucket
    /// assignments and is meant for tests and small deployments.
    pub max_hash: u64,
}

impl RouterConfig {
    /// Creates a validated configuration.
    ///
    /// # Arguments
    /// * `default_version` - Active mapping version label
    /// * `hash_policy` - Handling of unsupported column kinds
    /// * `max_hash` - Top of the hash codomain (>= 15)
    ///
    /// # Returns
    /// Validated configuration or error
    pub fn new(default_version: &str, hash_policy: HashPolicy, max_hash: u64) -> crate::Result<Self> {
        let default_version = MappingVersion::new(default_version)?;
        BucketBoundaries::with_max_hash(max_hash)?;
        Ok(Self {
            default_version,
            hash_policy,
            max_hash,
        })
    }

    /// Replaces the default mapping version.
    pub fn with_default_version(mut self, version: MappingVersion) -> Self {
        self.default_version = version;
        self
    }

    /// Replaces the hash policy.
    pub fn with_hash_policy(mut self, policy: HashPolicy) -> Self {
        self.hash_policy = policy;
        self
    }

    /// Replaces the codomain maximum, validating it.
    pub fn with_max_hash(mut self, max_hash: u64) -> crate::Result<Self> {
        BucketBoundaries::with_max_hash(max_hash)?;
        self.max_hash = max_hash;
        Ok(self)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_version: MappingVersion::default(),
            hash_policy: HashPolicy::SkipUnsupported,
            max_hash: u64::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_valid_config() {
        let config = RouterConfig::new("B", HashPolicy::Strict, 1000);
        assert!(config.is_ok());

        let config = config.unwrap();
        assert_eq!(config.default_version.as_str(), "B");
        assert_eq!(config.hash_policy, HashPolicy::Strict);
        assert_eq!(config.max_hash, 1000);
    }

    #[test]
    fn test_invalid_version() {
        let config = RouterConfig::new("", HashPolicy::SkipUnsupported, u64::MAX);
        assert!(matches!(config, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_max_hash() {
        let config = RouterConfig::new("A", HashPolicy::SkipUnsupported, 3);
        assert!(matches!(config, Err(Error::Bucket(_))));

        assert!(RouterConfig::default().with_max_hash(14).is_err());
        assert_eq!(RouterConfig::default().with_max_hash(15).unwrap().max_hash, 15);
    }

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.default_version.as_str(), "A");
        assert_eq!(config.hash_policy, HashPolicy::SkipUnsupported);
        assert_eq!(config.max_hash, u64::MAX);
    }

    #[test]
    fn test_builders() {
        let config = RouterConfig::default()
            .with_default_version(MappingVersion::new("C").unwrap())
            .with_hash_policy(HashPolicy::Strict);
        assert_eq!(config.default_version.as_str(), "C");
        assert_eq!(config.hash_policy, HashPolicy::Strict);
    }
}
