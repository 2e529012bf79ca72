//! Per-provider lifecycle state.

use crate::error::{ProviderError, Result};
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    /// Built, no successful retrieve yet.
    Constructed,
    /// At least one retrieve has succeeded.
    Active,
    /// Shut down. Terminal.
    ShutDown,
}

const CONSTRUCTED: u8 = 0;
const ACTIVE: u8 = 1;
const SHUT_DOWN: u8 = 2;

/// Tracks `Constructed -> Active -> ShutDown` for one provider.
///
/// Each provider owns its own `Lifecycle`; nothing is shared between providers.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    /// Start in [`ProviderState::Constructed`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> ProviderState {
        match self.state.load(Ordering::Acquire) {
            CONSTRUCTED => ProviderState::Constructed,
            ACTIVE => ProviderState::Active,
            _ => ProviderState::ShutDown,
        }
    }

    /// Whether the provider has been shut down.
    pub fn is_shut_down(&self) -> bool {
        self.state.load(Ordering::Acquire) == SHUT_DOWN
    }

    /// Fail with [`ProviderError::Configuration`] once shut down.
    pub fn ensure_open(&self, provider: &str) -> Result<()> {
        if self.is_shut_down() {
            return Err(ProviderError::configuration(format!(
                "provider {} has been shut down",
                provider
            )));
        }
        Ok(())
    }

    /// Record a successful retrieve. Never leaves the terminal state.
    pub fn mark_active(&self) {
        let _ = self.state.compare_exchange(
            CONSTRUCTED,
            ACTIVE,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Move to [`ProviderState::ShutDown`]. Returns `true` only for the call
    /// that performed the transition.
    pub fn shut_down(&self) -> bool {
        self.state.swap(SHUT_DOWN, Ordering::AcqRel) != SHUT_DOWN
    }
}
