//! Watch-capable file configuration provider.

use crate::core::{
    ChangeCallback, ConfigMap, Context, Lifecycle, Provider, Retrieved, SimpleRetrieved,
};
use crate::error::Result;
use crate::sources::file::{check_locator, read_yaml_file};
use crate::watch::{FileWatch, HandlerSlot};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Provider that decodes a local YAML file and reports changes to it.
///
/// Passing a callback to [`retrieve`](Provider::retrieve) starts a file
/// watch (or reuses the running one) and makes that callback the one events
/// are delivered to, replacing any callback from an earlier retrieve.
/// Retrieving with `None` stops the watch. [`shutdown`](Provider::shutdown)
/// stops it for good.
///
/// Callbacks run on the watcher's thread. A single save may be reported more
/// than once.
///
/// # Examples
///
/// ```rust,no_run
/// use confmap_provider::prelude::*;
///
/// # async fn example() -> Result<()> {
/// let provider = WatchedFileProvider::new("config.yaml");
/// let (callback, mut changes) = change_channel();
///
/// let ctx = Context::background();
/// let mut current = provider.retrieve(&ctx, Some(callback.clone()))?;
///
/// while changes.recv().await.is_some() {
///     current.release()?;
///     current = provider.retrieve(&ctx, Some(callback.clone()))?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct WatchedFileProvider {
    path: PathBuf,
    lifecycle: Lifecycle,
    handler: HandlerSlot,
    watch: Mutex<Option<FileWatch>>,
}

impl WatchedFileProvider {
    /// Create a provider for the file at `path`. No watch starts until the
    /// first retrieve with a callback.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lifecycle: Lifecycle::new(),
            handler: Arc::new(Mutex::new(None)),
            watch: Mutex::new(None),
        }
    }

    /// The file this provider reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a file watch is currently running.
    pub fn is_watching(&self) -> bool {
        self.watch.lock().is_some()
    }

    /// Register `on_change`, then read the file with `read`.
    ///
    /// The watch is running before the read starts, so a write that lands
    /// after the read is still reported. If the read fails the registration
    /// is rolled back to what it was before the call.
    fn retrieve_with<F>(
        &self,
        ctx: &Context,
        on_change: Option<ChangeCallback>,
        read: F,
    ) -> Result<ConfigMap>
    where
        F: FnOnce(&Context, &Path) -> Result<ConfigMap>,
    {
        self.lifecycle.ensure_open(&self.name())?;
        check_locator(&self.path)?;
        ctx.check()?;

        let mut watch = self.watch.lock();

        // Checked under the watch lock: shutdown flips the state before
        // taking this lock, so a watch started here is always torn down.
        self.lifecycle.ensure_open(&self.name())?;

        match on_change {
            Some(callback) => {
                let started = watch.is_none();
                if started {
                    *watch = Some(FileWatch::start(&self.path, Arc::clone(&self.handler))?);
                }
                let previous = self.handler.lock().replace(callback);

                match read(ctx, &self.path) {
                    Ok(map) => {
                        if started {
                            debug!(provider = %self.name(), "file watch started");
                        }
                        Ok(map)
                    }
                    Err(err) => {
                        *self.handler.lock() = previous;
                        if started {
                            *watch = None;
                        }
                        Err(err)
                    }
                }
            }
            None => {
                let map = read(ctx, &self.path)?;
                *self.handler.lock() = None;
                if watch.take().is_some() {
                    debug!(provider = %self.name(), "file watch stopped");
                }
                Ok(map)
            }
        }
    }
}

impl Provider for WatchedFileProvider {
    fn retrieve(
        &self,
        ctx: &Context,
        on_change: Option<ChangeCallback>,
    ) -> Result<Box<dyn Retrieved>> {
        let map = self.retrieve_with(ctx, on_change, read_yaml_file)?;
        self.lifecycle.mark_active();

        debug!(provider = %self.name(), keys = map.len(), "retrieved configuration");
        Ok(SimpleRetrieved::boxed(map))
    }

    fn shutdown(&self, _ctx: &Context) -> Result<()> {
        let first = self.lifecycle.shut_down();

        let watch = self.watch.lock().take();
        *self.handler.lock() = None;

        if watch.is_some() {
            debug!(provider = %self.name(), "file watch stopped");
        }
        drop(watch);

        if first {
            debug!(provider = %self.name(), "provider shut down");
        }
        Ok(())
    }

    fn name(&self) -> String {
        format!("watched-file:{}", self.path.display())
    }
}

impl Drop for WatchedFileProvider {
    fn drop(&mut self) {
        *self.handler.lock() = None;
    }
}
