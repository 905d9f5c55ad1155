//! Sink capability and the sinks shipped with the core.
//!
//! # Data Flow
//! ```text
//! Logger::is_enabled(level)  → LogSink::is_enabled(category, level)
//! Logger::write(..)          → LogSink::write_log(&LogEntry)
//! LogProvider::dispose()     → ChangeSubscription::release() + LogSink::flush()
//! ```
//!
//! # Design Decisions
//! - A sink is a small capability trait, not a base type
//! - `write_log` reports failures; the provider contains them
//! - Filtering lives in the sink so each sink keeps its own policy

use std::fmt;
use std::sync::Arc;

use crate::entry::{LogEntry, LogLevel};
use crate::error::{ReleaseError, SinkError};

mod filter;
mod memory;
mod tracing_sink;

pub use filter::{FilterSettings, LevelFilter};
pub use memory::{MemorySink, DEFAULT_CAPACITY, MAX_CAPACITY};
pub use tracing_sink::TracingSink;

/// Destination for log entries.
pub trait LogSink: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Called once while the owning provider is built. An error here fails
    /// provider construction.
    fn open(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Whether entries at `level` for `category` should be built at all.
    fn is_enabled(&self, category: &str, level: LogLevel) -> bool;

    /// Emit one entry. Best effort.
    fn write_log(&self, entry: &LogEntry) -> Result<(), SinkError>;

    /// Push out anything buffered. Called on disposal.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn open(&self) -> Result<(), SinkError> {
        (**self).open()
    }

    fn is_enabled(&self, category: &str, level: LogLevel) -> bool {
        (**self).is_enabled(category, level)
    }

    fn write_log(&self, entry: &LogEntry) -> Result<(), SinkError> {
        (**self).write_log(entry)
    }

    fn flush(&self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

/// A held change-notification registration, e.g. a config file watch.
///
/// The provider releases it exactly once, when it is disposed.
pub trait ChangeSubscription: Send {
    fn release(self: Box<Self>) -> Result<(), ReleaseError>;
}

/// A subscription whose release runs a closure.
pub struct CallbackSubscription {
    on_release: Box<dyn FnOnce() -> Result<(), ReleaseError> + Send>,
}

impl CallbackSubscription {
    pub fn new<F>(on_release: F) -> Self
    where
        F: FnOnce() -> Result<(), ReleaseError> + Send + 'static,
    {
        Self {
            on_release: Box::new(on_release),
        }
    }
}

impl fmt::Debug for CallbackSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSubscription").finish_non_exhaustive()
    }
}

impl ChangeSubscription for CallbackSubscription {
    fn release(self: Box<Self>) -> Result<(), ReleaseError> {
        (self.on_release)()
    }
}
