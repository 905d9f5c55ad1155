//! Logging provider subsystem.
//!
//! # Data Flow
//! ```text
//! create_logger(category)
//!     → LoggerRegistry::get_or_create (hit: existing handle, miss: new handle)
//!
//! Logger::write(cx, level, message, payload, error)
//!     → LogSink::is_enabled (disabled: return, no work)
//!     → ScopeProvider::flatten(cx)
//!     → LogEntry
//!     → LogSink::write_log (errors and panics contained)
//!
//! dispose()
//!     → Active → Disposed (once)
//!     → release change token, flush sink, drop registry
//! ```
//!
//! # Design Decisions
//! - One handle per (provider, category), enforced by a concurrent map
//! - Handles share provider state through `Arc`, the registry is not shared
//! - Disposed providers stay usable but inert

mod factory;
mod log_provider;
mod logger;
mod registry;

pub use factory::{CompositeLogger, LoggerFactory};
pub use log_provider::{LogProvider, LogProviderBuilder};
pub use logger::Logger;
pub use registry::LoggerRegistry;
