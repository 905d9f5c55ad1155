//! Provider core: registry ownership, scope wiring, failure containment and
//! disposal.

use std::error::Error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;

use crate::entry::{render_error_chain, Fields, LogEntry, LogLevel};
use crate::error::{ProviderError, ProviderResult};
use crate::provider::{Logger, LoggerRegistry};
use crate::scope::{ChainScopeProvider, ScopeContext, ScopeGuard, ScopeProvider};
use crate::sink::{ChangeSubscription, LogSink};

/// Holder so an unsized provider can live inside an `ArcSwapOption`.
struct ScopeSlot(Arc<dyn ScopeProvider>);

/// State shared between a provider and every handle it created.
pub(crate) struct ProviderShared {
    sink: Box<dyn LogSink>,
    scopes: ArcSwapOption<ScopeSlot>,
    include_scopes: bool,
    disposed: AtomicBool,
    written: AtomicU64,
    dropped: AtomicU64,
}

impl ProviderShared {
    pub(crate) fn sink_name(&self) -> &str {
        self.sink.name()
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    pub(crate) fn is_enabled(&self, category: &str, level: LogLevel) -> bool {
        !self.is_disposed() && self.sink.is_enabled(category, level)
    }

    /// Current scope provider, installing the default on first access.
    pub(crate) fn scope_provider(&self) -> Arc<dyn ScopeProvider> {
        if let Some(slot) = self.scopes.load_full() {
            return Arc::clone(&slot.0);
        }
        // rcu keeps a provider installed concurrently instead of replacing it.
        self.scopes.rcu(|current| match current {
            Some(slot) => Some(Arc::clone(slot)),
            None => Some(Arc::new(ScopeSlot(Arc::new(ChainScopeProvider::new())))),
        });
        match self.scopes.load_full() {
            Some(slot) => Arc::clone(&slot.0),
            None => Arc::new(ChainScopeProvider::new()),
        }
    }

    fn set_scope_provider(&self, provider: Arc<dyn ScopeProvider>) {
        self.scopes.store(Some(Arc::new(ScopeSlot(provider))));
    }

    /// Assemble the entry and hand it to the sink. The caller has already
    /// checked the level.
    pub(crate) fn write(
        &self,
        category: &Arc<str>,
        cx: &ScopeContext,
        level: LogLevel,
        message: String,
        payload: Fields,
        error: Option<&(dyn Error + 'static)>,
    ) {
        let scopes = if self.include_scopes {
            self.scope_provider().flatten(cx)
        } else {
            Fields::new()
        };
        let entry = LogEntry::new(
            level,
            Arc::clone(category),
            message,
            payload,
            scopes,
            error.map(render_error_chain),
        );
        self.dispatch(&entry);
    }

    fn dispatch(&self, entry: &LogEntry) {
        match panic::catch_unwind(AssertUnwindSafe(|| self.sink.write_log(entry))) {
            Ok(Ok(())) => {
                self.written.fetch_add(1, Ordering::Relaxed);
            }
            Ok(Err(err)) => self.record_failure(entry, &err.to_string()),
            Err(_) => self.record_failure(entry, "sink panicked"),
        }
    }

    fn record_failure(&self, entry: &LogEntry, reason: &str) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(
            "log_provider_sink_failures_total",
            "sink" => self.sink.name().to_string()
        )
        .increment(1);
        tracing::warn!(
            sink = %self.sink.name(),
            category = %entry.category(),
            level = %entry.level(),
            error = %reason,
            "Log entry dropped"
        );
    }
}

/// A logging provider bound to one sink.
///
/// Owns the category registry and the scope provider, and runs the
/// Active → Disposed lifecycle. [`dispose`](Self::dispose) is idempotent and
/// also runs on `Drop`.
///
/// # After disposal
///
/// The provider is inert: every handle reports `is_enabled == false` and
/// writes are no-ops. `create_logger` keeps working without panicking but
/// returns a fresh, uncached, inert handle, and the registry stays empty.
pub struct LogProvider {
    shared: Arc<ProviderShared>,
    registry: LoggerRegistry,
    change_token: Mutex<Option<Box<dyn ChangeSubscription>>>,
}

impl LogProvider {
    pub fn builder<S: LogSink + 'static>(sink: S) -> LogProviderBuilder {
        LogProviderBuilder::new(sink)
    }

    /// Build a provider with default options.
    pub fn new<S: LogSink + 'static>(sink: S) -> ProviderResult<Self> {
        Self::builder(sink).build()
    }

    /// The single handle for `category`.
    pub fn create_logger(&self, category: &str) -> Arc<Logger> {
        if self.shared.is_disposed() {
            return Arc::new(Logger::new(Arc::clone(&self.shared), Arc::from(category)));
        }

        let logger = self
            .registry
            .get_or_create(category, |key| Logger::new(Arc::clone(&self.shared), key));

        // Lost a race with dispose(): keep the registry empty afterwards.
        if self.shared.is_disposed() {
            self.registry.clear();
        }
        logger
    }

    pub fn begin_scope<'a>(&self, cx: &'a ScopeContext, state: Fields) -> ScopeGuard<'a> {
        self.shared.scope_provider().begin_scope(cx, state)
    }

    /// Replace the scope provider. Visible to every handle immediately.
    pub fn set_scope_provider(&self, provider: Arc<dyn ScopeProvider>) {
        self.shared.set_scope_provider(provider);
    }

    pub fn scope_provider(&self) -> Arc<dyn ScopeProvider> {
        self.shared.scope_provider()
    }

    pub fn is_enabled(&self, category: &str, level: LogLevel) -> bool {
        self.shared.is_enabled(category, level)
    }

    pub fn sink_name(&self) -> &str {
        self.shared.sink_name()
    }

    pub fn registry(&self) -> &LoggerRegistry {
        &self.registry
    }

    /// Entries the sink accepted.
    pub fn written_entries(&self) -> u64 {
        self.shared.written.load(Ordering::Relaxed)
    }

    /// Entries lost to sink errors or panics.
    pub fn dropped_entries(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.is_disposed()
    }

    /// Move to the Disposed state. Later calls do nothing.
    ///
    /// Releases the change token, flushes the sink and abandons the
    /// registry. Failures along the way are logged and swallowed; in-flight
    /// writes are not waited for.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        let token = self
            .change_token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(token) = token {
            release_token(self.sink_name(), token);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.shared.sink.flush())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(
                    sink = %self.sink_name(),
                    error = %e,
                    "Sink flush failed during dispose"
                )
            }
            Err(_) => tracing::warn!(sink = %self.sink_name(), "Sink panicked during flush"),
        }

        let abandoned = self.registry.len();
        self.registry.clear();
        tracing::debug!(sink = %self.sink_name(), loggers = abandoned, "Log provider disposed");
    }
}

fn release_token(sink: &str, token: Box<dyn ChangeSubscription>) {
    match panic::catch_unwind(AssertUnwindSafe(move || token.release())) {
        Ok(Ok(())) => tracing::debug!(sink = %sink, "Change subscription released"),
        Ok(Err(e)) => tracing::warn!(
            sink = %sink,
            error = %e,
            "Ignoring change subscription release failure"
        ),
        Err(_) => tracing::warn!(sink = %sink, "Change subscription panicked on release"),
    }
}

impl Drop for LogProvider {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for LogProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogProvider")
            .field("sink", &self.sink_name())
            .field("loggers", &self.registry.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Builder for [`LogProvider`].
pub struct LogProviderBuilder {
    sink: Box<dyn LogSink>,
    scope_provider: Option<Arc<dyn ScopeProvider>>,
    change_token: Option<Box<dyn ChangeSubscription>>,
    include_scopes: bool,
}

impl LogProviderBuilder {
    pub fn new<S: LogSink + 'static>(sink: S) -> Self {
        Self {
            sink: Box::new(sink),
            scope_provider: None,
            change_token: None,
            include_scopes: true,
        }
    }

    pub fn scope_provider(mut self, provider: Arc<dyn ScopeProvider>) -> Self {
        self.scope_provider = Some(provider);
        self
    }

    /// Subscription released when the provider is disposed.
    pub fn change_token<T: ChangeSubscription + 'static>(mut self, token: T) -> Self {
        self.change_token = Some(Box::new(token));
        self
    }

    /// When false, entries carry no scope context.
    pub fn include_scopes(mut self, include: bool) -> Self {
        self.include_scopes = include;
        self
    }

    /// Open the sink and assemble the provider.
    pub fn build(self) -> ProviderResult<LogProvider> {
        let name = self.sink.name().to_string();
        if let Err(source) = self.sink.open() {
            tracing::error!(sink = %name, error = %source, "Sink failed to open");
            if let Some(token) = self.change_token {
                release_token(&name, token);
            }
            return Err(ProviderError::SinkInit { sink: name, source });
        }

        let shared = ProviderShared {
            sink: self.sink,
            scopes: ArcSwapOption::empty(),
            include_scopes: self.include_scopes,
            disposed: AtomicBool::new(false),
            written: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        };
        if let Some(provider) = self.scope_provider {
            shared.set_scope_provider(provider);
        }

        tracing::debug!(sink = %name, include_scopes = self.include_scopes, "Log provider created");
        Ok(LogProvider {
            shared: Arc::new(shared),
            registry: LoggerRegistry::new(),
            change_token: Mutex::new(self.change_token),
        })
    }
}
