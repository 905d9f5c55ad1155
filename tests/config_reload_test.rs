//! Hot reload of level filters from a watched config file.

use std::path::Path;
use std::time::Duration;

use log_provider_core::config::{ConfigWatcher, LoggingConfig};
use log_provider_core::sink::FilterSettings;
use log_provider_core::{LevelFilter, LogLevel, LogProvider, MemorySink};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{timeout, Instant};

const RELOAD_WAIT: Duration = Duration::from_secs(10);

/// Receives updates until one satisfies `applied`. Returns everything seen.
async fn wait_for(
    updates: &mut UnboundedReceiver<LoggingConfig>,
    applied: impl Fn(&LoggingConfig) -> bool,
) -> Vec<LoggingConfig> {
    let deadline = Instant::now() + RELOAD_WAIT;
    let mut seen = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match timeout(remaining, updates.recv()).await {
            Ok(Some(config)) => {
                let done = applied(&config);
                seen.push(config);
                if done {
                    return seen;
                }
            }
            Ok(None) => panic!("watcher stopped before the update was applied; seen {seen:?}"),
            Err(_) => panic!("no matching update within {RELOAD_WAIT:?}; seen {seen:?}"),
        }
    }
}

fn write_config(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_rewrite_reloads_filter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logging.toml");
    write_config(&path, "min_level = \"info\"\n");

    let filter = LevelFilter::new(FilterSettings::new(LogLevel::Info));
    let (watcher, mut updates) = ConfigWatcher::new(&path, filter.clone());
    let _token = watcher.run().unwrap();

    let provider = LogProvider::new(MemorySink::with_default_capacity(filter.clone())).unwrap();
    let logger = provider.create_logger("orders");
    assert!(logger.is_enabled(LogLevel::Info));

    write_config(&path, "min_level = \"error\"\n[categories]\n\"audit\" = \"debug\"\n");
    wait_for(&mut updates, |c| {
        c.min_level == LogLevel::Error && c.categories.contains_key("audit")
    })
    .await;

    let settings = filter.settings();
    assert_eq!(settings.default_level, LogLevel::Error);
    assert_eq!(settings.min_level_for("audit.trail"), LogLevel::Debug);
    assert!(!logger.is_enabled(LogLevel::Warning));
    assert!(logger.is_enabled(LogLevel::Error));
    assert!(provider.create_logger("audit.trail").is_enabled(LogLevel::Debug));
}

#[tokio::test]
async fn test_invalid_rewrite_keeps_current_filters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logging.toml");
    write_config(&path, "min_level = \"info\"\n");

    let filter = LevelFilter::new(FilterSettings::new(LogLevel::Info));
    let (watcher, mut updates) = ConfigWatcher::new(&path, filter.clone());
    let _token = watcher.run().unwrap();

    // Every prefix of this document either fails validation or parses to
    // the defaults, so no read can lower the level to debug.
    write_config(&path, "memory_capacity = 0\nmin_level = \"debug\"\n");
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(filter.settings().default_level, LogLevel::Info);

    write_config(&path, "min_level = \"warning\"\n");
    let seen = wait_for(&mut updates, |c| c.min_level == LogLevel::Warning).await;

    assert!(seen.iter().all(|c| c.min_level != LogLevel::Debug));
    assert!(seen.iter().all(|c| c.memory_capacity != 0));
    assert_eq!(filter.settings().default_level, LogLevel::Warning);
}

#[tokio::test]
async fn test_disposed_provider_stops_reloading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logging.toml");
    write_config(&path, "min_level = \"info\"\n");

    let filter = LevelFilter::new(FilterSettings::new(LogLevel::Info));
    let (watcher, mut updates) = ConfigWatcher::new(&path, filter.clone());
    let provider = LogProvider::builder(MemorySink::with_default_capacity(filter.clone()))
        .change_token(watcher.run().unwrap())
        .build()
        .unwrap();

    write_config(&path, "min_level = \"warning\"\n");
    wait_for(&mut updates, |c| c.min_level == LogLevel::Warning).await;

    provider.dispose();
    provider.dispose();
    // Events queued before the watch was removed drain first.
    tokio::time::sleep(Duration::from_millis(200)).await;
    write_config(&path, "min_level = \"error\"\n");

    // Releasing the token drops the watcher and its sender; pending updates
    // from before disposal may still drain, none may carry the new level.
    let deadline = Instant::now() + Duration::from_secs(1);
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match timeout(remaining, updates.recv()).await {
            Ok(Some(config)) => assert_ne!(config.min_level, LogLevel::Error),
            Ok(None) | Err(_) => break,
        }
    }
    assert_eq!(filter.settings().default_level, LogLevel::Warning);
    assert!(!provider.create_logger("orders").is_enabled(LogLevel::Critical));
}
