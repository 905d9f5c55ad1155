//! Pluggable logging provider core.
//!
//! A provider owns a sink, a registry of named logger handles (one per
//! category), and a scope provider for key/value enrichment carried through
//! an explicit [`ScopeContext`]. Providers are disposed deterministically.

pub mod config;
pub mod entry;
pub mod error;
pub mod provider;
pub mod scope;
pub mod sink;

pub use config::LoggingConfig;
pub use entry::{FieldValue, Fields, LogEntry, LogLevel};
pub use error::{ProviderError, SinkError};
pub use provider::{CompositeLogger, LogProvider, LogProviderBuilder, Logger, LoggerFactory};
pub use scope::{ScopeContext, ScopeGuard, ScopeProvider};
pub use sink::{LevelFilter, LogSink, MemorySink, TracingSink};
