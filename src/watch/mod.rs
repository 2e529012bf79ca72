//! Change watching for watch-capable providers.
//!
//! Wraps the `notify` crate so providers can turn file system events into
//! [`ChangeEvent`](crate::core::ChangeEvent)s.

pub mod watcher;

pub use watcher::{FileWatch, HandlerSlot};
