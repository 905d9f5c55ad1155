//! Bounded in-memory sink.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::entry::{LogEntry, LogLevel};
use crate::error::SinkError;
use crate::sink::{LevelFilter, LogSink};

/// Default number of entries kept.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Largest capacity `open` accepts.
pub const MAX_CAPACITY: usize = 1_000_000;

/// Ring buffer of recent entries. When full, the oldest entry is evicted.
///
/// Clones share the same buffer, so a host can keep one clone for queries
/// after handing another to a provider.
#[derive(Debug, Clone)]
pub struct MemorySink {
    inner: Arc<MemorySinkInner>,
}

#[derive(Debug)]
struct MemorySinkInner {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
    evicted: AtomicU64,
    filter: LevelFilter,
}

impl MemorySink {
    /// Creates the sink. Capacity is checked by [`LogSink::open`], so an
    /// out-of-range value surfaces as a construction error, not a panic here.
    pub fn new(capacity: usize, filter: LevelFilter) -> Self {
        Self {
            inner: Arc::new(MemorySinkInner {
                entries: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
                capacity,
                evicted: AtomicU64::new(0),
                filter,
            }),
        }
    }

    pub fn with_default_capacity(filter: LevelFilter) -> Self {
        Self::new(DEFAULT_CAPACITY, filter)
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        // A panic while holding the lock cannot leave the deque half-updated.
        self.inner.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the buffered entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Buffered entries whose category starts with `prefix`.
    pub fn entries_for(&self, prefix: &str) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|e| e.category().starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of entries dropped to make room.
    pub fn evicted(&self) -> u64 {
        self.inner.evicted.load(Ordering::Relaxed)
    }
}

impl LogSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn open(&self) -> Result<(), SinkError> {
        if self.inner.capacity == 0 {
            return Err(SinkError::Init("memory sink capacity must be > 0".into()));
        }
        if self.inner.capacity > MAX_CAPACITY {
            return Err(SinkError::Init(format!(
                "memory sink capacity {} exceeds maximum {}",
                self.inner.capacity, MAX_CAPACITY
            )));
        }
        Ok(())
    }

    fn is_enabled(&self, category: &str, level: LogLevel) -> bool {
        self.inner.filter.is_enabled(category, level)
    }

    fn write_log(&self, entry: &LogEntry) -> Result<(), SinkError> {
        let mut entries = self.lock();
        if entries.len() >= self.inner.capacity {
            entries.pop_front();
            self.inner.evicted.fetch_add(1, Ordering::Relaxed);
        }
        entries.push_back(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Fields;

    fn entry(category: &str, message: &str) -> LogEntry {
        LogEntry::new(
            LogLevel::Info,
            Arc::from(category),
            message,
            Fields::new(),
            Fields::new(),
            None,
        )
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let sink = MemorySink::new(2, LevelFilter::default());
        sink.write_log(&entry("a", "1")).unwrap();
        sink.write_log(&entry("a", "2")).unwrap();
        sink.write_log(&entry("a", "3")).unwrap();

        let messages: Vec<_> = sink.entries().iter().map(|e| e.message().to_string()).collect();
        assert_eq!(messages, vec!["2", "3"]);
        assert_eq!(sink.evicted(), 1);
    }

    #[test]
    fn test_zero_capacity_fails_open() {
        let sink = MemorySink::new(0, LevelFilter::default());
        assert!(matches!(sink.open(), Err(SinkError::Init(_))));
    }

    #[test]
    fn test_oversized_capacity_fails_open_without_allocating() {
        let sink = MemorySink::new(usize::MAX, LevelFilter::default());
        assert!(matches!(sink.open(), Err(SinkError::Init(_))));
        assert!(sink.is_empty());

        let sink = MemorySink::new(MAX_CAPACITY, LevelFilter::default());
        assert!(sink.open().is_ok());
    }

    #[test]
    fn test_clones_share_buffer() {
        let sink = MemorySink::with_default_capacity(LevelFilter::default());
        let view = sink.clone();
        sink.write_log(&entry("orders.api", "x")).unwrap();
        sink.write_log(&entry("billing", "y")).unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view.entries_for("orders").len(), 1);
        view.clear();
        assert!(sink.is_empty());
    }
}
