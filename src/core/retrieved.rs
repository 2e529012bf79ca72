//! Retrieval results.

use std::fmt;

use crate::core::ConfigMap;
use crate::error::Result;

/// The result of one [`Provider::retrieve`](crate::core::Provider::retrieve) call.
///
/// Holds a point-in-time [`ConfigMap`] plus whatever the backend allocated
/// for this snapshot. `release` consumes the value, so it runs at most once.
pub trait Retrieved: Send + Sync {
    /// The decoded configuration.
    fn config_map(&self) -> &ConfigMap;

    /// Free snapshot-scoped resources.
    ///
    /// # Errors
    ///
    /// Backends with nothing to free never fail.
    fn release(self: Box<Self>) -> Result<()>;

    /// Take the map out, releasing everything else.
    fn into_config_map(self: Box<Self>) -> ConfigMap;
}

impl fmt::Debug for dyn Retrieved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Retrieved").field(self.config_map()).finish()
    }
}

/// A [`Retrieved`] holding only an in-memory map.
///
/// Static backends that neither watch nor allocate per-snapshot resources
/// return this; its release is a no-op.
#[derive(Debug, Clone, Default)]
pub struct SimpleRetrieved {
    map: ConfigMap,
}

impl SimpleRetrieved {
    /// Wrap a decoded map.
    pub fn new(map: ConfigMap) -> Self {
        Self { map }
    }

    /// Wrap a decoded map, boxed for return from `retrieve`.
    pub fn boxed(map: ConfigMap) -> Box<dyn Retrieved> {
        Box::new(Self::new(map))
    }
}

impl Retrieved for SimpleRetrieved {
    fn config_map(&self) -> &ConfigMap {
        &self.map
    }

    fn release(self: Box<Self>) -> Result<()> {
        Ok(())
    }

    fn into_config_map(self: Box<Self>) -> ConfigMap {
        self.map
    }
}
