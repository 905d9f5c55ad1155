//! Named logger handle.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::entry::{Fields, LogLevel};
use crate::provider::log_provider::ProviderShared;
use crate::scope::{ScopeContext, ScopeGuard};

/// Entry point for one category on one provider.
///
/// Obtained from [`LogProvider::create_logger`](crate::LogProvider::create_logger);
/// the provider hands out exactly one handle per category. The handle holds
/// nothing but its category and a reference to the provider's shared state.
pub struct Logger {
    shared: Arc<ProviderShared>,
    category: Arc<str>,
}

impl Logger {
    pub(crate) fn new(shared: Arc<ProviderShared>, category: Arc<str>) -> Self {
        Self { shared, category }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Whether an entry at `level` would reach the sink. No side effects.
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.shared.is_enabled(&self.category, level)
    }

    /// Build and emit an entry if `level` is enabled.
    ///
    /// `message` is only converted once the level check passes. Sink
    /// failures are contained by the provider and never reach the caller.
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
        self.shared
            .write(&self.category, cx, level, message.into(), payload, error);
    }

    pub fn log(&self, cx: &ScopeContext, level: LogLevel, message: impl Into<String>) {
        self.write(cx, level, message, Fields::new(), None);
    }

    pub fn trace(&self, cx: &ScopeContext, message: impl Into<String>) {
        self.log(cx, LogLevel::Trace, message);
    }

    pub fn debug(&self, cx: &ScopeContext, message: impl Into<String>) {
        self.log(cx, LogLevel::Debug, message);
    }

    pub fn info(&self, cx: &ScopeContext, message: impl Into<String>) {
        self.log(cx, LogLevel::Info, message);
    }

    pub fn warn(&self, cx: &ScopeContext, message: impl Into<String>) {
        self.log(cx, LogLevel::Warning, message);
    }

    pub fn error(
        &self,
        cx: &ScopeContext,
        message: impl Into<String>,
        error: Option<&(dyn Error + 'static)>,
    ) {
        self.write(cx, LogLevel::Error, message, Fields::new(), error);
    }

    pub fn critical(
        &self,
        cx: &ScopeContext,
        message: impl Into<String>,
        error: Option<&(dyn Error + 'static)>,
    ) {
        self.write(cx, LogLevel::Critical, message, Fields::new(), error);
    }

    /// Push a scope through the owning provider's scope provider.
    pub fn begin_scope<'a>(&self, cx: &'a ScopeContext, state: Fields) -> ScopeGuard<'a> {
        self.shared.scope_provider().begin_scope(cx, state)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("category", &self.category)
            .field("sink", &self.shared.sink_name())
            .finish()
    }
}
