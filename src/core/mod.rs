//! Core provider contract types.

mod change;
mod context;
mod lifecycle;
mod map;
mod provider;
mod retrieved;
mod yaml;

pub use change::{ChangeCallback, ChangeEvent, change_channel, on_change};
pub use context::Context;
pub use lifecycle::{Lifecycle, ProviderState};
pub use map::ConfigMap;
pub use provider::Provider;
pub use retrieved::{Retrieved, SimpleRetrieved};
