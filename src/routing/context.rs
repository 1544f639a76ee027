//! Per-query routing context supplied by the embedding engine.

use crate::mapping::MappingVersion;

/// Query-scoped routing settings.
///
/// A query may pin the mapping version it reads, e.g. to keep a snapshot
/// query on the old generation while a cutover is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingContext {
    active_version: Option<MappingVersion>,
}

impl RoutingContext {
    /// Context without overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context pinned to `version`.
    pub fn with_active_version(mut self, version: MappingVersion) -> Self {
        self.active_version = Some(version);
        self
    }

    /// Context built from the engine's raw setting; blank means no override.
    pub fn from_setting(label: &str) -> Self {
        Self {
            active_version: MappingVersion::new(label).ok(),
        }
    }

    /// The pinned version, if any.
    pub fn active_version(&self) -> Option<&MappingVersion> {
        self.active_version.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_setting() {
        assert_eq!(RoutingContext::from_setting("").active_version(), None);
        assert_eq!(RoutingContext::from_setting(" ").active_version(), None);
        assert_eq!(
            RoutingContext::from_setting("C").active_version().map(|v| v.as_str()),
            Some("C")
        );
    }

    #[test]
    fn test_with_active_version() {
        let ctx = RoutingContext::new().with_active_version(MappingVersion::new("B").unwrap());
        assert_eq!(ctx.active_version().map(|v| v.as_str()), Some("B"));
        assert_eq!(RoutingContext::new().active_version(), None);
    }
}
