//! Command-line property configuration provider.

use crate::core::{
    ChangeCallback, ConfigMap, Context, Lifecycle, Provider, Retrieved, SimpleRetrieved,
};
use crate::error::{ProviderError, Result};
use tracing::debug;

/// Provider built from `key.path=value` strings, as passed by repeated
/// `--set` flags.
///
/// Dots in a key create nested tables. Values stay strings; typed access
/// goes through [`ConfigMap::try_deserialize`] or `config::Value` conversions.
/// An empty list yields an empty map.
///
/// # Examples
///
/// ```rust
/// use confmap_provider::prelude::*;
///
/// let provider = PropertiesProvider::new(["server.port=8080", "mode=debug"]);
/// let retrieved = provider.retrieve(&Context::background(), None).unwrap();
/// assert!(retrieved.config_map().get_path("server.port").is_some());
/// ```
#[derive(Debug)]
pub struct PropertiesProvider {
    properties: Vec<String>,
    lifecycle: Lifecycle,
}

impl PropertiesProvider {
    /// Create a provider from `key=value` strings.
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            properties: properties.into_iter().map(Into::into).collect(),
            lifecycle: Lifecycle::new(),
        }
    }

    /// The raw property strings.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    fn load(&self) -> Result<ConfigMap> {
        if self.properties.is_empty() {
            return Ok(ConfigMap::new());
        }

        let mut builder = config::Config::builder();
        for property in &self.properties {
            let (key, value) = split_property(property)?;
            builder = builder.set_override(key, value).map_err(|e| {
                ProviderError::configuration(format!("invalid property '{}': {}", property, e))
            })?;
        }

        let config = builder
            .build()
            .map_err(|e| ProviderError::decode(self.name(), e))?;
        let map = config
            .try_deserialize::<config::Map<String, config::Value>>()
            .map_err(|e| ProviderError::decode(self.name(), e))?;
        Ok(ConfigMap::from(map))
    }
}

fn split_property(property: &str) -> Result<(&str, &str)> {
    match property.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(ProviderError::configuration(format!(
            "property '{}' is not of the form key=value",
            property
        ))),
    }
}

impl Provider for PropertiesProvider {
    fn retrieve(
        &self,
        ctx: &Context,
        _on_change: Option<ChangeCallback>,
    ) -> Result<Box<dyn Retrieved>> {
        self.lifecycle.ensure_open(&self.name())?;
        ctx.check()?;

        let map = self.load()?;
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
        "properties".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_property() {
        assert_eq!(split_property("a.b=c").unwrap(), ("a.b", "c"));
        assert_eq!(split_property("a=").unwrap(), ("a", ""));
        assert_eq!(split_property("url=http://x?a=b").unwrap(), ("url", "http://x?a=b"));
        assert!(split_property("novalue").is_err());
        assert!(split_property("=value").is_err());
    }

    #[test]
    fn test_nested_properties() {
        let provider = PropertiesProvider::new(["server.port=8080", "server.host=localhost"]);
        let retrieved = provider.retrieve(&Context::background(), None).unwrap();
        let map = retrieved.config_map();

        assert_eq!(map.len(), 1);
        let host = map.get_path("server.host").unwrap().clone();
        assert_eq!(host.into_string().unwrap(), "localhost");
        let port = map.get_path("server.port").unwrap().clone();
        assert_eq!(port.into_int().unwrap(), 8080);
    }

    #[test]
    fn test_later_property_wins() {
        let provider = PropertiesProvider::new(["mode=debug", "mode=release"]);
        let retrieved = provider.retrieve(&Context::background(), None).unwrap();
        let mode = retrieved.config_map().get("mode").unwrap().clone();
        assert_eq!(mode.into_string().unwrap(), "release");
    }

    #[test]
    fn test_empty_properties() {
        let provider = PropertiesProvider::new(Vec::<String>::new());
        let retrieved = provider.retrieve(&Context::background(), None).unwrap();
        assert!(retrieved.config_map().is_empty());
    }

    #[test]
    fn test_malformed_property() {
        let provider = PropertiesProvider::new(["server.port"]);
        let err = provider.retrieve(&Context::background(), None).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration { .. }));
    }
}
