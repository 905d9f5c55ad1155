//! Configuration file watcher for hot reload of level filters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::LoggingConfig;
use crate::error::ReleaseError;
use crate::sink::{ChangeSubscription, FilterSettings, LevelFilter};

/// Watches a config file and reloads a [`LevelFilter`] when it changes.
pub struct ConfigWatcher {
    path: PathBuf,
    filter: LevelFilter,
    update_tx: mpsc::UnboundedSender<LoggingConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(
        path: &Path,
        filter: LevelFilter,
    ) -> (Self, mpsc::UnboundedReceiver<LoggingConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                filter,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned token stops the watch when released or dropped; hand it
    /// to the provider so disposal ends the subscription.
    pub fn run(self) -> Result<WatchToken, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();
        let filter = self.filter.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Logging config change detected, reloading...");
                        match load_config(&path) {
                            Ok(new_config) => {
                                filter.reload(FilterSettings::from_config(&new_config));
                                let _ = tx.send(new_config);
                            }
                            Err(e) => {
                                tracing::error!(
                                    "Failed to reload logging config: {}. Keeping current filters.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Logging config watcher started");
        Ok(WatchToken {
            watcher: Some(watcher),
            path: self.path,
        })
    }
}

/// Live file watch. Releasing or dropping it stops change notifications.
pub struct WatchToken {
    watcher: Option<RecommendedWatcher>,
    path: PathBuf,
}

impl WatchToken {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for WatchToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchToken")
            .field("path", &self.path)
            .field("active", &self.watcher.is_some())
            .finish()
    }
}

impl ChangeSubscription for WatchToken {
    fn release(mut self: Box<Self>) -> Result<(), ReleaseError> {
        if let Some(mut watcher) = self.watcher.take() {
            watcher
                .unwatch(&self.path)
                .map_err(|e| ReleaseError(e.to_string()))?;
            tracing::info!(path = ?self.path, "Logging config watcher stopped");
        }
        Ok(())
    }
}
