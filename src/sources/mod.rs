//! Provider implementations.

mod env;
mod file;
mod memory;
mod properties;
#[cfg(feature = "file-watch")]
mod watched_file;

pub use env::EnvProvider;
pub use file::FileProvider;
pub use memory::InMemoryProvider;
pub use properties::PropertiesProvider;
#[cfg(feature = "file-watch")]
pub use watched_file::WatchedFileProvider;
