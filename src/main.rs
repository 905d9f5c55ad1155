//! Demo host for the logging provider core.
//!
//! ```text
//!   CLI args ──▶ LoggingConfig ──▶ LevelFilter ◀── ConfigWatcher (optional)
//!                                       │
//!                  ┌────────────────────┴───────────────────┐
//!                  ▼                                        ▼
//!        LogProvider(TracingSink)                 LogProvider(MemorySink)
//!                  └──────────────┬─────────────────────────┘
//!                                 ▼
//!                           LoggerFactory
//!                                 │
//!            simulated requests (one ScopeContext per task)
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use log_provider_core::config::{load_config, ConfigWatcher, LoggingConfig};
use log_provider_core::sink::FilterSettings;
use log_provider_core::{
    Fields, LevelFilter, LogLevel, LogProvider, LoggerFactory, MemorySink, ScopeContext,
    TracingSink,
};

#[derive(Parser)]
#[command(name = "log-provider-host")]
#[command(about = "Runs simulated requests through the logging provider core", long_about = None)]
struct Cli {
    /// Logging config file (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of concurrent simulated requests.
    #[arg(short, long, default_value_t = 8)]
    requests: usize,

    /// Keep running and hot-reload the config file until Ctrl-C.
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "log_provider_core=debug,log_provider_host=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LoggingConfig::default(),
    };

    tracing::info!(
        min_level = %config.min_level,
        overrides = config.categories.len(),
        include_scopes = config.include_scopes,
        "Configuration loaded"
    );

    let filter = LevelFilter::new(FilterSettings::from_config(&config));

    let mut tracing_provider = LogProvider::builder(TracingSink::new(filter.clone()))
        .include_scopes(config.include_scopes);
    if let (true, Some(path)) = (cli.watch, &cli.config) {
        let (watcher, mut updates) = ConfigWatcher::new(path, filter.clone());
        tracing_provider = tracing_provider.change_token(watcher.run()?);
        tokio::spawn(async move {
            while let Some(new_config) = updates.recv().await {
                tracing::info!(min_level = %new_config.min_level, "Logging config applied");
            }
        });
    }

    let memory = MemorySink::new(config.memory_capacity, filter.clone());
    let memory_provider = LogProvider::builder(memory.clone())
        .include_scopes(config.include_scopes)
        .build()?;

    let factory = Arc::new(
        LoggerFactory::new()
            .with_provider(tracing_provider.build()?)
            .with_provider(memory_provider),
    );

    let mut tasks = Vec::with_capacity(cli.requests);
    for worker in 0..cli.requests {
        let factory = Arc::clone(&factory);
        tasks.push(tokio::spawn(async move {
            handle_request(&factory, worker).await;
        }));
    }
    for task in tasks {
        task.await?;
    }

    let dropped: u64 = factory.providers().iter().map(|p| p.dropped_entries()).sum();
    tracing::info!(
        buffered = memory.len(),
        evicted = memory.evicted(),
        dropped,
        "Simulated requests complete"
    );

    if cli.watch {
        tracing::info!("Watching for config changes, press Ctrl-C to exit");
        tokio::signal::ctrl_c().await?;
    }

    factory.dispose();
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn handle_request(factory: &LoggerFactory, worker: usize) {
    let cx = ScopeContext::new();
    let _request = factory.begin_scope(
        &cx,
        Fields::new()
            .with("request_id", Uuid::new_v4().to_string())
            .with("worker", worker),
    );

    let requests = factory.create_logger("host.requests");
    requests.log(&cx, LogLevel::Info, "Request started");

    {
        let _db = factory.begin_scope(&cx, Fields::new().with("step", "db"));
        let store = factory.create_logger("host.store");
        let delay = Duration::from_millis(5 * (worker % 4) as u64);
        tokio::time::sleep(delay).await;
        store.write(
            &cx,
            LogLevel::Debug,
            "Query finished",
            Fields::new().with("elapsed_ms", delay.as_millis() as u64),
            None,
        );
        if worker % 4 == 3 {
            store.log(&cx, LogLevel::Warning, "Slow query");
        }
    }

    requests.log(&cx, LogLevel::Info, "Request finished");
}
