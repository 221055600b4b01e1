//! Bounded in-memory diagnostic log
//!
//! Voice and network events are recorded into a fixed-capacity ring buffer
//! so recent history can be exported for debugging without unbounded memory
//! growth. Every record is also emitted through `tracing`, so the normal
//! structured log stream sees the same events.
//!
//! The log is an explicitly constructed collaborator: controllers receive a
//! [`DiagnosticLog`] handle at construction instead of reaching for ambient
//! global state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of entries retained by default
const DEFAULT_CAPACITY: usize = 100;

/// Category used for voice subsystem entries
const VOICE_CATEGORY: &str = "VOICE";

/// Severity of a diagnostic entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Fine-grained event flow
    Debug,
    /// Normal operation
    Info,
    /// Degraded but recoverable
    Warn,
    /// Failed operation
    Error,
}

/// One diagnostic record
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,
    /// Severity
    pub level: LogLevel,
    /// Subsystem category (e.g. `VOICE`, `COMPAT`)
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Optional structured payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Cheaply clonable handle to a shared, bounded diagnostic buffer
#[derive(Clone)]
pub struct DiagnosticLog {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl DiagnosticLog {
    /// Create a log with the default capacity of 100 entries
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a log retaining at most `capacity` entries
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Record an entry, evicting the oldest ones beyond capacity
    pub fn record(
        &self,
        level: LogLevel,
        category: &str,
        message: &str,
        data: Option<serde_json::Value>,
    ) {
        match level {
            LogLevel::Debug => tracing::debug!(category, "{}", message),
            LogLevel::Info => tracing::info!(category, "{}", message),
            LogLevel::Warn => tracing::warn!(category, "{}", message),
            LogLevel::Error => tracing::error!(category, "{}", message),
        }

        if let Ok(mut entries) = self.entries.lock() {
            entries.push_back(LogEntry {
                timestamp: Utc::now(),
                level,
                category: category.to_string(),
                message: message.to_string(),
                data,
            });

            while entries.len() > self.capacity {
                entries.pop_front();
            }
        }
    }

    /// Record a debug entry
    pub fn debug(&self, category: &str, message: &str) {
        self.record(LogLevel::Debug, category, message, None);
    }

    /// Record an info entry
    pub fn info(&self, category: &str, message: &str) {
        self.record(LogLevel::Info, category, message, None);
    }

    /// Record a warning entry
    pub fn warn(&self, category: &str, message: &str) {
        self.record(LogLevel::Warn, category, message, None);
    }

    /// Record an error entry
    pub fn error(&self, category: &str, message: &str) {
        self.record(LogLevel::Error, category, message, None);
    }

    /// Record a voice subsystem event
    pub fn voice_event(&self, message: &str) {
        self.record(LogLevel::Debug, VOICE_CATEGORY, message, None);
    }

    /// Record a voice subsystem failure
    pub fn voice_error(&self, message: &str) {
        self.record(LogLevel::Error, VOICE_CATEGORY, message, None);
    }

    /// Snapshot of all retained entries, oldest first
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Export retained entries as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn export_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Drop all retained entries
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Number of retained entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Whether the log holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of retained entries
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}
