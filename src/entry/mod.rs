//! Log entry data model.
//!
//! # Data Flow
//! ```text
//! Logger::write(level, message, payload, error)
//!     → scope context flattened (scope module)
//!     → LogEntry (immutable, timestamped)
//!     → LogSink::write_log(&entry)
//! ```
//!
//! # Design Decisions
//! - Entries are immutable once constructed
//! - Payload and scope context are ordered key/value sequences, not maps
//! - The category string is shared with the logger handle (`Arc<str>`)

#[allow(clippy::module_inception)]
mod entry;
mod fields;
mod level;

pub use entry::{render_error_chain, LogEntry};
pub use fields::{FieldValue, Fields};
pub use level::{LogLevel, ParseLevelError};
