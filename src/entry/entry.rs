//! The immutable log entry handed to sinks.

use std::error::Error;
use std::sync::Arc;
use std::time::SystemTime;

use serde::Serialize;

use crate::entry::{FieldValue, Fields, LogLevel};

/// A single log event, fully assembled before it reaches a sink.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    level: LogLevel,
    category: Arc<str>,
    message: String,
    payload: Fields,
    /// Flattened scope context, outermost scope first.
    scopes: Fields,
    error: Option<String>,
    timestamp: SystemTime,
}

impl LogEntry {
    /// Build an entry stamped with the current time.
    pub fn new(
        level: LogLevel,
        category: Arc<str>,
        message: impl Into<String>,
        payload: Fields,
        scopes: Fields,
        error: Option<String>,
    ) -> Self {
        Self {
            level,
            category,
            message: message.into(),
            payload,
            scopes,
            error,
            timestamp: SystemTime::now(),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> &Fields {
        &self.payload
    }

    pub fn scopes(&self) -> &Fields {
        &self.scopes
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Look up a payload field.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.payload.get(key)
    }

    /// Look up a scope value; the innermost scope wins on repeated keys.
    pub fn scope_value(&self, key: &str) -> Option<&FieldValue> {
        self.scopes.get(key)
    }

    /// Render as a single JSON line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Render an error and its `source()` chain as `outer: inner: root`.
pub fn render_error_chain(err: &(dyn Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Root;

    #[derive(Debug, thiserror::Error)]
    #[error("collector unreachable")]
    struct Outer(#[source] Root);

    #[test]
    fn test_error_chain_rendering() {
        let err = Outer(Root);
        assert_eq!(render_error_chain(&err), "collector unreachable: connection refused");
    }

    #[test]
    fn test_entry_accessors() {
        let entry = LogEntry::new(
            LogLevel::Error,
            Arc::from("orders"),
            "failed",
            Fields::new().with("order", 7),
            Fields::new().with("request_id", "1").with("request_id", "2"),
            Some("boom".into()),
        );
        assert_eq!(entry.category(), "orders");
        assert_eq!(entry.field("order"), Some(&FieldValue::I64(7)));
        assert_eq!(entry.scope_value("request_id"), Some(&FieldValue::from("2")));
        assert_eq!(entry.error(), Some("boom"));
    }

    #[test]
    fn test_json_contains_category_and_level() {
        let entry = LogEntry::new(
            LogLevel::Info,
            Arc::from("api"),
            "hello",
            Fields::new(),
            Fields::new(),
            None,
        );
        let json = entry.to_json().unwrap();
        assert!(json.contains("\"category\":\"api\""));
        assert!(json.contains("\"level\":\"info\""));
    }
}
