//! Several providers behind one `create_logger`.

use std::error::Error;
use std::sync::Arc;

use crate::entry::{Fields, LogLevel};
use crate::provider::{LogProvider, Logger};
use crate::scope::{ChainScopeProvider, ScopeContext, ScopeGuard, ScopeProvider};

/// Fans each category out to every registered provider.
///
/// All providers share one scope provider, so a scope begun through the
/// factory shows up in the entries of every sink.
#[derive(Debug)]
pub struct LoggerFactory {
    providers: Vec<LogProvider>,
    scope_provider: Arc<dyn ScopeProvider>,
}

impl LoggerFactory {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            scope_provider: Arc::new(ChainScopeProvider::new()),
        }
    }

    pub fn with_provider(mut self, provider: LogProvider) -> Self {
        self.add_provider(provider);
        self
    }

    pub fn add_provider(&mut self, provider: LogProvider) {
        provider.set_scope_provider(Arc::clone(&self.scope_provider));
        self.providers.push(provider);
    }

    /// Swap the shared scope provider on every registered provider.
    pub fn set_scope_provider(&mut self, scope_provider: Arc<dyn ScopeProvider>) {
        for provider in &self.providers {
            provider.set_scope_provider(Arc::clone(&scope_provider));
        }
        self.scope_provider = scope_provider;
    }

    pub fn providers(&self) -> &[LogProvider] {
        &self.providers
    }

    pub fn create_logger(&self, category: &str) -> CompositeLogger {
        CompositeLogger {
            category: Arc::from(category),
            loggers: self
                .providers
                .iter()
                .map(|p| p.create_logger(category))
                .collect(),
        }
    }

    pub fn begin_scope<'a>(&self, cx: &'a ScopeContext, state: Fields) -> ScopeGuard<'a> {
        self.scope_provider.begin_scope(cx, state)
    }

    /// Dispose every provider. Safe to call more than once.
    pub fn dispose(&self) {
        for provider in &self.providers {
            provider.dispose();
        }
    }
}

impl Default for LoggerFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// One category's handles across all providers of a factory.
#[derive(Debug, Clone)]
pub struct CompositeLogger {
    category: Arc<str>,
    loggers: Vec<Arc<Logger>>,
}

impl CompositeLogger {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn loggers(&self) -> &[Arc<Logger>] {
        &self.loggers
    }

    /// True if any provider would accept `level`.
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.loggers.iter().any(|l| l.is_enabled(level))
    }

    pub fn write(
        &self,
        cx: &ScopeContext,
        level: LogLevel,
        message: impl Into<String>,
        payload: Fields,
        error: Option<&(dyn Error + 'static)>,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        let message = message.into();
        for logger in &self.loggers {
            logger.write(cx, level, message.as_str(), payload.clone(), error);
        }
    }

    pub fn log(&self, cx: &ScopeContext, level: LogLevel, message: impl Into<String>) {
        self.write(cx, level, message, Fields::new(), None);
    }
}
