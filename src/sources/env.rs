//! Environment variable configuration provider.

use crate::core::{
    ChangeCallback, ConfigMap, Context, Lifecycle, Provider, Retrieved, SimpleRetrieved,
};
use crate::error::{ProviderError, Result};
use config::Environment;
use tracing::debug;

/// Provider that reads environment variables under a prefix.
///
/// The separator splits variable names into nested keys, and values are
/// parsed into numbers and booleans where possible. Keys are lowercased.
/// The environment cannot be watched, so the change callback is never invoked.
///
/// # Examples
///
/// ```rust
/// use confmap_provider::sources::EnvProvider;
///
/// // APP_SERVER__PORT=8080 -> server.port = 8080
/// let provider = EnvProvider::new("APP");
/// ```
#[derive(Debug)]
pub struct EnvProvider {
    prefix: String,
    separator: String,
    lifecycle: Lifecycle,
}

impl EnvProvider {
    /// Create a provider for variables named `{prefix}_...`.
    ///
    /// Nested keys are separated by `__` (e.g. `APP_DB__HOST` -> `db.host`).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: "__".to_string(),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Use a different separator for nested keys.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// The variable prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn load(&self) -> Result<ConfigMap> {
        let env_source = Environment::with_prefix(&self.prefix)
            .prefix_separator("_")
            .separator(&self.separator)
            .try_parsing(true);

        let config = config::Config::builder()
            .add_source(env_source)
            .build()
            .map_err(|e| ProviderError::decode(self.name(), e))?;

        let map = config
            .try_deserialize::<config::Map<String, config::Value>>()
            .map_err(|e| ProviderError::decode(self.name(), e))?;

        Ok(ConfigMap::from(map))
    }
}

impl Provider for EnvProvider {
    fn retrieve(
        &self,
        ctx: &Context,
        _on_change: Option<ChangeCallback>,
    ) -> Result<Box<dyn Retrieved>> {
        self.lifecycle.ensure_open(&self.name())?;
        if self.prefix.is_empty() {
            return Err(ProviderError::configuration(
                "environment variable prefix not specified",
            ));
        }
        if self.separator.is_empty() {
            return Err(ProviderError::configuration(
                "environment key separator not specified",
            ));
        }
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
        format!("env:{}*", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_provider_creation() {
        let provider = EnvProvider::new("APP");
        assert_eq!(provider.prefix(), "APP");
        assert_eq!(provider.separator, "__");
    }

    #[test]
    fn test_with_separator() {
        let provider = EnvProvider::new("APP").with_separator("_");
        assert_eq!(provider.separator, "_");
    }

    #[test]
    fn test_name() {
        let provider = EnvProvider::new("APP");
        assert_eq!(provider.name(), "env:APP*");
    }

    #[test]
    fn test_empty_prefix() {
        let err = EnvProvider::new("")
            .retrieve(&Context::background(), None)
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration { .. }));
    }

    #[test]
    fn test_empty_separator() {
        let err = EnvProvider::new("APP")
            .with_separator("")
            .retrieve(&Context::background(), None)
            .unwrap_err();
        assert!(matches!(err, ProviderError::Configuration { .. }));
    }

    #[test]
    fn test_load_empty() {
        let provider = EnvProvider::new("CMP_ENV_UNIT_NONEXISTENT");
        let retrieved = provider.retrieve(&Context::background(), None).unwrap();
        assert!(retrieved.config_map().is_empty());
    }

    #[test]
    fn test_retrieve_after_shutdown() {
        let provider = EnvProvider::new("CMP_ENV_UNIT_NONEXISTENT");
        provider.shutdown(&Context::background()).unwrap();
        let err = provider.retrieve(&Context::background(), None).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration { .. }));
    }
}
