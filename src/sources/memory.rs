//! In-memory configuration provider.

use crate::core::{
    ChangeCallback, ConfigMap, Context, Lifecycle, Provider, Retrieved, SimpleRetrieved,
};
use crate::error::{ProviderError, Result};
use config::FileFormat;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// Provider that decodes a document already held in memory.
///
/// The buffer is the locator, so an empty buffer is a valid empty document
/// rather than a configuration error. Nothing to watch, nothing to release.
///
/// # Examples
///
/// ```rust
/// use confmap_provider::prelude::*;
///
/// let provider = InMemoryProvider::new("port: 8080\n");
/// let retrieved = provider.retrieve(&Context::background(), None).unwrap();
/// assert!(retrieved.config_map().contains_key("port"));
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryProvider {
    content: Arc<str>,
    format: FileFormat,
    lifecycle: Arc<Lifecycle>,
}

impl InMemoryProvider {
    /// Create a provider over a YAML document.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Arc::from(content.into()),
            format: FileFormat::Yaml,
            lifecycle: Arc::new(Lifecycle::new()),
        }
    }

    /// Read the whole document from `reader` up front.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ResourceUnavailable`] if reading fails and
    /// [`ProviderError::Decode`] if the bytes are not UTF-8.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| ProviderError::unavailable("inmemory", e))?;
        let content = String::from_utf8(bytes).map_err(|e| ProviderError::decode("inmemory", e))?;
        Ok(Self::new(content))
    }

    /// Decode the buffer as `format` instead of YAML.
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = format;
        self
    }
}

impl Provider for InMemoryProvider {
    fn retrieve(
        &self,
        ctx: &Context,
        _on_change: Option<ChangeCallback>,
    ) -> Result<Box<dyn Retrieved>> {
        self.lifecycle.ensure_open(&self.name())?;
        ctx.check()?;

        let map = ConfigMap::parse(&self.name(), self.format, &self.content)?;
        self.lifecycle.mark_active();

        debug!(provider = %self.name(), keys = map.len(), "retrieved configuration");
        Ok(SimpleRetrieved::boxed(map))
    }

    fn shutdown(&self, _ctx: &Context) -> Result<()> {
        if self.lifecycle.shut_down() {
            debug!(provider = %self.name(), "provider shut down");
        }
        Ok(())
    }

    fn name(&self) -> String {
        "inmemory".to_string()
    }
}
