//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LoggingConfig (validated, immutable)
//!     → FilterSettings → LevelFilter shared by sinks
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the LevelFilter settings
//!     → sinks observe new levels on the next is_enabled
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Only level filters hot-reload; scope inclusion is fixed per provider
//! - The watch is a change token owned by the provider and released on dispose

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::LoggingConfig;
pub use validation::ValidationError;
pub use watcher::{ConfigWatcher, WatchToken};
