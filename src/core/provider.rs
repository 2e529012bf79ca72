//! Provider trait.

use crate::core::{ChangeCallback, Context, Retrieved};
use crate::error::Result;

/// A configuration backend.
///
/// Implement this trait to plug a new source (file, environment, remote
/// store) into anything that consumes providers. A provider is bound to one
/// backend locator at construction and keeps it for its whole life.
///
/// # Lifecycle
///
/// `Constructed -> Active -> ShutDown`. `retrieve` may be called any number
/// of times before [`shutdown`](Self::shutdown); afterwards it fails with
/// [`ProviderError::Configuration`](crate::error::ProviderError::Configuration).
///
/// # Concurrency
///
/// `retrieve` and `shutdown` take `&self` and may race. A shutdown must tear
/// down any watch a concurrent retrieve registers.
pub trait Provider: Send + Sync {
    /// Fetch and decode the backend's current content.
    ///
    /// `on_change` asks the provider to watch its source and call back when it
    /// changes. Pass `None` for a one-shot read. Backends that cannot watch
    /// ignore the callback.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the locator is empty or the provider is shut down
    /// - `ResourceUnavailable` if the backend cannot be read
    /// - `Decode` if the content is not a valid configuration document
    /// - `Cancelled` or `DeadlineExceeded` if `ctx` ends the call
    fn retrieve(&self, ctx: &Context, on_change: Option<ChangeCallback>)
    -> Result<Box<dyn Retrieved>>;

    /// Release long-lived backend resources such as watch handles.
    ///
    /// Idempotent, and safe to call without any prior `retrieve`.
    fn shutdown(&self, ctx: &Context) -> Result<()>;

    /// Human-readable name for this provider (for logging/debugging).
    fn name(&self) -> String;
}
