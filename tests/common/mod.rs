//! Shared fakes for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use log_provider_core::error::SinkError;
use log_provider_core::{LogEntry, LogLevel, LogSink};

/// Sink with a fixed minimum level that records every call it receives.
#[allow(dead_code)]
#[derive(Clone)]
pub struct CountingSink {
    min_level: LogLevel,
    pub enabled_checks: Arc<AtomicUsize>,
    pub writes: Arc<AtomicUsize>,
    pub entries: Arc<Mutex<Vec<LogEntry>>>,
}

#[allow(dead_code)]
impl CountingSink {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            enabled_checks: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(AtomicUsize::new(0)),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl LogSink for CountingSink {
    fn name(&self) -> &str {
        "counting"
    }

    fn is_enabled(&self, _category: &str, level: LogLevel) -> bool {
        self.enabled_checks.fetch_add(1, Ordering::SeqCst);
        level != LogLevel::None && level >= self.min_level
    }

    fn write_log(&self, entry: &LogEntry) -> Result<(), SinkError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Sink that fails every other write.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FlakySink {
    pub attempts: Arc<AtomicUsize>,
}

impl LogSink for FlakySink {
    fn name(&self) -> &str {
        "flaky"
    }

    fn is_enabled(&self, _category: &str, _level: LogLevel) -> bool {
        true
    }

    fn write_log(&self, _entry: &LogEntry) -> Result<(), SinkError> {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst);
        if n % 2 == 0 {
            Err(SinkError::Write(format!("transient failure #{}", n)))
        } else {
            Ok(())
        }
    }
}
