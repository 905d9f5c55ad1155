//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::LogLevel;
use crate::sink::DEFAULT_CAPACITY;

/// Root logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level for categories without an override.
    pub min_level: LogLevel,

    /// Category prefix → minimum level. The longest matching prefix wins.
    pub categories: BTreeMap<String, LogLevel>,

    /// Attach the active scope chain to every entry.
    pub include_scopes: bool,

    /// Entries kept by the in-memory sink.
    pub memory_capacity: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            categories: BTreeMap::new(),
            include_scopes: true,
            memory_capacity: DEFAULT_CAPACITY,
        }
    }
}
