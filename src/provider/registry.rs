//! Concurrent get-or-create cache of logger handles.

use std::sync::Arc;

use dashmap::DashMap;

use crate::provider::Logger;

/// Maps category names to their single [`Logger`] handle.
///
/// Backed by a sharded concurrent map: first access to a category takes a
/// short per-shard write lock, every later lookup is a read.
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    loggers: DashMap<Arc<str>, Arc<Logger>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `category`, building it with `make` on a miss.
    ///
    /// Concurrent callers racing on the same new category all receive the
    /// same handle; `make` runs at most once per category.
    pub fn get_or_create<F>(&self, category: &str, make: F) -> Arc<Logger>
    where
        F: FnOnce(Arc<str>) -> Logger,
    {
        if let Some(existing) = self.loggers.get(category) {
            return Arc::clone(existing.value());
        }

        let key: Arc<str> = Arc::from(category);
        let entry = self
            .loggers
            .entry(Arc::clone(&key))
            .or_insert_with(|| Arc::new(make(key)));
        Arc::clone(entry.value())
    }

    pub fn get(&self, category: &str) -> Option<Arc<Logger>> {
        self.loggers.get(category).map(|r| Arc::clone(r.value()))
    }

    pub fn contains(&self, category: &str) -> bool {
        self.loggers.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    /// Registered category names, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.iter().map(|r| r.key().to_string()).collect();
        names.sort();
        names
    }

    pub(crate) fn clear(&self) {
        self.loggers.clear();
    }
}
