//! Sink that forwards entries into the `tracing` ecosystem.

use crate::entry::{LogEntry, LogLevel};
use crate::error::SinkError;
use crate::sink::{LevelFilter, LogSink};

/// Forwards each entry as a `tracing` event.
///
/// Whatever subscriber the host installed decides the final output. The
/// entry's category, flattened scopes and payload are attached as fields.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    filter: LevelFilter,
}

impl TracingSink {
    pub fn new(filter: LevelFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &LevelFilter {
        &self.filter
    }
}

macro_rules! emit {
    ($macro:ident, $entry:expr, $critical:expr) => {
        tracing::$macro!(
            category = %$entry.category(),
            scopes = %$entry.scopes(),
            payload = %$entry.payload(),
            error = $entry.error(),
            critical = $critical,
            "{}",
            $entry.message()
        )
    };
}

impl LogSink for TracingSink {
    fn name(&self) -> &str {
        "tracing"
    }

    fn is_enabled(&self, category: &str, level: LogLevel) -> bool {
        self.filter.is_enabled(category, level)
    }

    fn write_log(&self, entry: &LogEntry) -> Result<(), SinkError> {
        match entry.level() {
            LogLevel::Trace => emit!(trace, entry, false),
            LogLevel::Debug => emit!(debug, entry, false),
            LogLevel::Info => emit!(info, entry, false),
            LogLevel::Warning => emit!(warn, entry, false),
            LogLevel::Error => emit!(error, entry, false),
            LogLevel::Critical => emit!(error, entry, true),
            LogLevel::None => {}
        }
        Ok(())
    }
}
