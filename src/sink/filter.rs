//! Reloadable level filter.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::LoggingConfig;
use crate::entry::LogLevel;

/// Minimum levels: a default plus per-category-prefix overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSettings {
    pub default_level: LogLevel,
    /// `(category prefix, minimum level)`; the longest matching prefix wins.
    pub overrides: Vec<(String, LogLevel)>,
}

impl FilterSettings {
    pub fn new(default_level: LogLevel) -> Self {
        Self {
            default_level,
            overrides: Vec::new(),
        }
    }

    pub fn with_override(mut self, prefix: impl Into<String>, level: LogLevel) -> Self {
        self.overrides.push((prefix.into(), level));
        self
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut overrides: Vec<(String, LogLevel)> = config
            .categories
            .iter()
            .map(|(prefix, level)| (prefix.clone(), *level))
            .collect();
        // Stable order so equal-length prefixes resolve the same way on every reload.
        overrides.sort();
        Self {
            default_level: config.min_level,
            overrides,
        }
    }

    /// Minimum level that applies to `category`.
    pub fn min_level_for(&self, category: &str) -> LogLevel {
        self.overrides
            .iter()
            .filter(|(prefix, _)| category.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(self.default_level, |(_, level)| *level)
    }

    pub fn allows(&self, category: &str, level: LogLevel) -> bool {
        level != LogLevel::None && level >= self.min_level_for(category)
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

/// Shared, atomically replaceable [`FilterSettings`].
///
/// Clones share the same settings, so a config watcher can hold one clone
/// and reload it while sinks read through theirs.
#[derive(Debug, Clone)]
pub struct LevelFilter {
    settings: Arc<ArcSwap<FilterSettings>>,
}

impl LevelFilter {
    pub fn new(settings: FilterSettings) -> Self {
        Self {
            settings: Arc::new(ArcSwap::from_pointee(settings)),
        }
    }

    /// A filter with a single minimum level and no overrides.
    pub fn fixed(min_level: LogLevel) -> Self {
        Self::new(FilterSettings::new(min_level))
    }

    pub fn is_enabled(&self, category: &str, level: LogLevel) -> bool {
        self.settings.load().allows(category, level)
    }

    pub fn reload(&self, settings: FilterSettings) {
        tracing::debug!(
            default_level = %settings.default_level,
            overrides = settings.overrides.len(),
            "Level filter reloaded"
        );
        self.settings.store(Arc::new(settings));
    }

    pub fn settings(&self) -> Arc<FilterSettings> {
        self.settings.load_full()
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::new(FilterSettings::default())
    }
}
