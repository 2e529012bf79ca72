//! Change notifications emitted by watch-capable providers.

use crate::error::ProviderError;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Callback invoked by a provider when its source content changes.
///
/// Watch-capable providers call it from their own notification thread, never
/// while holding a provider lock. Treat each call as a hint to call
/// `retrieve` again; serializing those re-retrievals is up to the caller.
pub type ChangeCallback = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

/// Signal that a provider's source has changed and should be retrieved again.
///
/// Delivery is at-least-once: a single edit may produce several events. The
/// event carries no data from the source.
#[derive(Clone, Default)]
pub struct ChangeEvent {
    error: Option<Arc<ProviderError>>,
}

impl ChangeEvent {
    /// The source content changed.
    pub fn changed() -> Self {
        Self::default()
    }

    /// The watch mechanism reported an error. The source may or may not have
    /// changed, so the caller should still retrieve again.
    pub fn watch_failed(error: ProviderError) -> Self {
        Self {
            error: Some(Arc::new(error)),
        }
    }

    /// The watch error, if the event reports one.
    pub fn error(&self) -> Option<&ProviderError> {
        self.error.as_deref()
    }

    /// Whether the event reports a watch error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl fmt::Debug for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(err) => write!(f, "ChangeEvent::WatchFailed({})", err),
            None => f.write_str("ChangeEvent::Changed"),
        }
    }
}

/// Wrap a closure as a [`ChangeCallback`].
pub fn on_change<F>(callback: F) -> ChangeCallback
where
    F: Fn(ChangeEvent) + Send + Sync + 'static,
{
    Arc::new(callback)
}

/// Create a callback that forwards events into a channel.
///
/// Sending never blocks the provider's notification thread. Once the
/// receiver is dropped, events are discarded.
///
/// # Examples
///
/// ```rust
/// use confmap_provider::core::{ChangeEvent, change_channel};
///
/// # async fn example() {
/// let (callback, mut rx) = change_channel();
/// callback(ChangeEvent::changed());
/// assert!(rx.recv().await.is_some());
/// # }
/// ```
pub fn change_channel() -> (ChangeCallback, mpsc::UnboundedReceiver<ChangeEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let callback = on_change(move |event| {
        let _ = tx.send(event);
    });
    (callback, rx)
}
