//! Error types for the provider core.
//!
//! Write-time sink failures never reach callers of `Logger::write`; only
//! construction-time failures surface as [`ProviderError`].

use thiserror::Error;

/// Errors raised by a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink could not be brought up.
    #[error("sink initialization failed: {0}")]
    Init(String),

    /// A single entry could not be emitted.
    #[error("sink write failed: {0}")]
    Write(String),
}

/// Errors raised while releasing a change subscription.
#[derive(Debug, Error)]
#[error("failed to release change subscription: {0}")]
pub struct ReleaseError(pub String);

/// Errors that make a provider unusable from the start.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The sink failed to open.
    #[error("sink `{sink}` failed to initialize: {source}")]
    SinkInit {
        sink: String,
        #[source]
        source: SinkError,
    },

    /// The reload watcher could not be installed.
    #[error("configuration watch failed: {0}")]
    Watch(#[from] notify::Error),
}

/// Result type for provider construction.
pub type ProviderResult<T> = Result<T, ProviderError>;
