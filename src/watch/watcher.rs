//! File watching for change notifications.

use crate::core::{ChangeCallback, ChangeEvent};
use crate::error::{ProviderError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{trace, warn};

/// Slot holding the callback a watch delivers to.
///
/// The provider swaps the callback on every retrieve; the watcher thread
/// clones it out and invokes it after the lock is released.
pub type HandlerSlot = Arc<Mutex<Option<ChangeCallback>>>;

/// Watches a single file and reports changes to a [`HandlerSlot`].
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by writing a new file and renaming it over the old one are still
/// seen. Only events naming the watched file are forwarded.
///
/// Dropping the `FileWatch` stops the underlying watcher without waiting on
/// its thread, so a callback may drop it (e.g. by shutting the provider down)
/// from the notification thread itself.
pub struct FileWatch {
    _watcher: RecommendedWatcher,
    file: PathBuf,
}

impl FileWatch {
    /// Start watching `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ResourceUnavailable`] if the path cannot be
    /// resolved or the platform watcher cannot be created.
    pub fn start(path: &Path, handler: HandlerSlot) -> Result<Self> {
        let locator = path.display().to_string();
        let file = path
            .canonicalize()
            .map_err(|e| ProviderError::unavailable(locator.as_str(), e))?;
        let (dir, file_name) = match (file.parent(), file.file_name()) {
            (Some(dir), Some(name)) => (dir.to_path_buf(), name.to_os_string()),
            _ => {
                return Err(ProviderError::configuration(format!(
                    "cannot watch {}: not a file path",
                    locator
                )));
            }
        };

        let event_locator = locator.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if is_relevant(&event, &file_name) {
                        trace!(path = %event_locator, kind = ?event.kind, "config file changed");
                        dispatch(&handler, ChangeEvent::changed());
                    }
                }
                Err(err) => {
                    warn!(path = %event_locator, error = %err, "file watch error");
                    dispatch(
                        &handler,
                        ChangeEvent::watch_failed(ProviderError::unavailable(
                            event_locator.as_str(),
                            err,
                        )),
                    );
                }
            }
        })
        .map_err(|e| ProviderError::unavailable(locator.as_str(), e))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| ProviderError::unavailable(locator.as_str(), e))?;

        Ok(Self {
            _watcher: watcher,
            file,
        })
    }

    /// The resolved path of the watched file.
    pub fn path(&self) -> &Path {
        &self.file
    }
}

fn is_relevant(event: &Event, file_name: &OsString) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

fn dispatch(handler: &HandlerSlot, event: ChangeEvent) {
    let callback = handler.lock().clone();
    if let Some(callback) = callback {
        callback(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::change_channel;
    use notify::event::{CreateKind, ModifyKind};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time::timeout;

    #[test]
    fn test_is_relevant() {
        let name = OsString::from("config.yaml");

        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/etc/app/config.yaml"));
        assert!(is_relevant(&event, &name));

        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/etc/app/other.yaml"));
        assert!(!is_relevant(&event, &name));

        let event = Event::new(EventKind::Any).add_path(PathBuf::from("/etc/app/config.yaml"));
        assert!(!is_relevant(&event, &name));
    }

    #[test]
    fn test_dispatch_empty_slot() {
        let slot: HandlerSlot = Arc::new(Mutex::new(None));
        dispatch(&slot, ChangeEvent::changed());
    }

    #[test]
    fn test_watch_nonexistent_file() {
        let slot: HandlerSlot = Arc::new(Mutex::new(None));
        let result = FileWatch::start(Path::new("/nonexistent/config.yaml"), slot);
        assert!(matches!(
            result,
            Err(ProviderError::ResourceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_change_dispatches() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "port: 8080").unwrap();

        let (callback, mut rx) = change_channel();
        let slot: HandlerSlot = Arc::new(Mutex::new(Some(callback)));
        let watch = FileWatch::start(&config_path, slot).unwrap();
        assert_eq!(watch.path(), config_path.canonicalize().unwrap());

        tokio::time::sleep(Duration::from_millis(50)).await;
        fs::write(&config_path, "port: 9090").unwrap();

        let result = timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(result.is_ok());
        assert!(!result.unwrap().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_sibling_change_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "port: 8080").unwrap();

        let (callback, mut rx) = change_channel();
        let slot: HandlerSlot = Arc::new(Mutex::new(Some(callback)));
        let _watch = FileWatch::start(&config_path, slot).unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        fs::write(temp_dir.path().join("other.yaml"), "port: 9090").unwrap();

        let result = timeout(Duration::from_millis(500), rx.recv()).await;
        assert!(result.is_err());
    }
}
