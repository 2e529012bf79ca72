//! File-based configuration provider.

use crate::core::{
    ChangeCallback, ConfigMap, Context, Lifecycle, Provider, Retrieved, SimpleRetrieved,
};
use crate::error::{ProviderError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Provider that decodes a local YAML file.
///
/// This backend does not watch: the change callback passed to `retrieve` is
/// never invoked, and `shutdown` only marks the provider as closed. Use
/// [`WatchedFileProvider`](crate::sources::WatchedFileProvider) for hot reload.
///
/// # Examples
///
/// ```rust,no_run
/// use confmap_provider::prelude::*;
///
/// # fn example() -> Result<()> {
/// let provider = FileProvider::new("config/default.yaml");
/// let retrieved = provider.retrieve(&Context::background(), None)?;
/// println!("{} top-level keys", retrieved.config_map().len());
/// retrieved.release()?;
/// provider.shutdown(&Context::background())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileProvider {
    path: PathBuf,
    lifecycle: Lifecycle,
}

impl FileProvider {
    /// Create a provider for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lifecycle: Lifecycle::new(),
        }
    }

    /// The file this provider reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read and decode a YAML file, honoring `ctx` around the read.
///
/// Shared by every file-backed provider.
pub(crate) fn read_yaml_file(ctx: &Context, path: &Path) -> Result<ConfigMap> {
    check_locator(path)?;
    ctx.check()?;

    let locator = path.display().to_string();
    let content =
        std::fs::read(path).map_err(|e| ProviderError::unavailable(locator.as_str(), e))?;

    ctx.check()?;

    let text =
        String::from_utf8(content).map_err(|e| ProviderError::decode(locator.as_str(), e))?;
    ConfigMap::parse(&locator, config::FileFormat::Yaml, &text)
}

pub(crate) fn check_locator(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ProviderError::configuration("config file not specified"));
    }
    Ok(())
}

impl Provider for FileProvider {
    fn retrieve(
        &self,
        ctx: &Context,
        _on_change: Option<ChangeCallback>,
    ) -> Result<Box<dyn Retrieved>> {
        self.lifecycle.ensure_open(&self.name())?;

        let map = read_yaml_file(ctx, &self.path)?;
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
        format!("file:{}", self.path.display())
    }
}
