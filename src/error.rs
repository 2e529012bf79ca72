//! Error types for confmap-provider.

/// Boxed cause carried by decode and watch errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur when retrieving configuration from a provider.
///
/// The variants split along how a caller should react: fix the setup
/// ([`Configuration`](Self::Configuration)), retry later
/// ([`ResourceUnavailable`](Self::ResourceUnavailable)), or wait for the source
/// content to change ([`Decode`](Self::Decode)).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider is misconfigured or has been shut down. No I/O was attempted.
    #[error("Invalid provider configuration: {message}")]
    Configuration {
        /// What is wrong with the provider setup
        message: String,
    },

    /// The backend could not be reached or the resource does not exist.
    #[error("Unable to read {locator}: {source}")]
    ResourceUnavailable {
        /// Backend locator, e.g. the file path
        locator: String,
        /// Underlying access failure
        #[source]
        source: BoxError,
    },

    /// The backend content was read but is not a valid configuration document.
    #[error("Unable to decode {locator}: {source}")]
    Decode {
        /// Backend locator, e.g. the file path
        locator: String,
        /// Underlying parse failure
        #[source]
        source: BoxError,
    },

    /// The invocation context was cancelled.
    #[error("Operation cancelled")]
    Cancelled,

    /// The invocation context deadline elapsed.
    #[error("Operation deadline exceeded")]
    DeadlineExceeded,
}

impl ProviderError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a resource-unavailable error wrapping the access failure.
    pub fn unavailable(locator: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ResourceUnavailable {
            locator: locator.into(),
            source: source.into(),
        }
    }

    /// Create a decode error wrapping the parse failure.
    pub fn decode(locator: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            locator: locator.into(),
            source: source.into(),
        }
    }

    /// Whether retrying the same call may succeed without any change to the
    /// provider or its source content.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ResourceUnavailable { .. })
    }

    /// Whether the error came from the invocation context rather than the backend.
    pub fn is_context_error(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// The underlying I/O error, if this error wraps one.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            Self::ResourceUnavailable { source, .. } | Self::Decode { source, .. } => {
                source.downcast_ref::<std::io::Error>()
            }
            _ => None,
        }
    }
}
