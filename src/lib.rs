//! # confmap-provider
//!
//! Pluggable configuration providers with snapshot retrieval and change notifications.
//!
//! ## Overview
//!
//! A [`Provider`](core::Provider) fetches configuration from one backend and
//! decodes it into a [`ConfigMap`](core::ConfigMap):
//! - `retrieve` performs one blocking fetch-and-decode and returns a
//!   [`Retrieved`](core::Retrieved) snapshot
//! - an optional change callback asks watch-capable backends to report
//!   when the source changes, so the caller can retrieve again
//! - `shutdown` releases watch handles; the provider rejects retrieves afterwards
//!
//! Merging maps from several providers and deciding when to reload is left to
//! the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use confmap_provider::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let provider = FileProvider::new("config.yaml");
//! let ctx = Context::background();
//!
//! let retrieved = provider.retrieve(&ctx, None)?;
//! if let Some(port) = retrieved.config_map().get_path("server.port") {
//!     println!("Server port: {}", port);
//! }
//!
//! retrieved.release()?;
//! provider.shutdown(&ctx)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Providers
//!
//! - [`FileProvider`](sources::FileProvider): a YAML file, no watching
//! - `WatchedFileProvider`: a YAML file with change notifications (`file-watch` feature)
//! - [`EnvProvider`](sources::EnvProvider): environment variables under a prefix
//! - [`InMemoryProvider`](sources::InMemoryProvider): a YAML, JSON or TOML buffer
//! - [`PropertiesProvider`](sources::PropertiesProvider): `key.path=value` strings
//!
//! ## Feature Flags
//!
//! - `file-watch` (default): enables `WatchedFileProvider` via the `notify` crate

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod sources;

#[cfg(feature = "file-watch")]
pub mod watch;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        ChangeCallback, ChangeEvent, ConfigMap, Context, Provider, Retrieved, SimpleRetrieved,
        change_channel, on_change,
    };
    pub use crate::error::{ProviderError, Result};
    pub use crate::sources::{EnvProvider, FileProvider, InMemoryProvider, PropertiesProvider};

    #[cfg(feature = "file-watch")]
    pub use crate::sources::WatchedFileProvider;
}
