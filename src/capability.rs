//! Host capability detection
//!
//! Probes the hosting environment for speech synthesis, speech recognition,
//! key-value storage, and touch input support. Each check is a pure query
//! that never propagates an error; a failing probe reports `false` so the
//! UI can degrade to manual input instead of surfacing a hard failure.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::diagnostics::{DiagnosticLog, LogLevel};
use crate::voice::{RecognitionEngine, SynthesisEngine};
use crate::{Error, Result};

/// Category for capability log entries
const COMPAT_CATEGORY: &str = "COMPAT";

/// Throwaway key written and removed again by the storage probe
const PROBE_KEY: &str = "__quizvoice_probe__";

/// Simple fallible key-value storage, the local cache abstraction
pub trait KeyValueStore: Send + Sync {
    /// Store a value under a key
    ///
    /// # Errors
    ///
    /// Returns error if the store is unavailable
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Fetch the value under a key
    ///
    /// # Errors
    ///
    /// Returns error if the store is unavailable
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove a key
    ///
    /// # Errors
    ///
    /// Returns error if the store is unavailable
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory key-value store
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Whether the store holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Storage("store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::Storage("store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Storage("store lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Store whose every operation fails; test double for unavailable storage
#[derive(Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Storage("storage unavailable".to_string()))
    }

    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::Storage("storage unavailable".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(Error::Storage("storage unavailable".to_string()))
    }
}

/// Boolean support matrix for the four probed capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct CapabilityReport {
    /// Text-to-speech output available
    pub speech_synthesis: bool,
    /// Speech-to-text input available
    pub speech_recognition: bool,
    /// Key-value storage usable
    pub local_storage: bool,
    /// Touch input present
    pub touch_support: bool,
}

/// Probes the host for the capabilities the voice subsystem depends on
pub struct CapabilityDetector {
    synthesis: Option<Arc<dyn SynthesisEngine>>,
    recognition: Option<Arc<dyn RecognitionEngine>>,
    storage: Option<Arc<dyn KeyValueStore>>,
    touch_points: u32,
    log: DiagnosticLog,
}

impl CapabilityDetector {
    /// Create a detector with no capabilities attached
    #[must_use]
    pub const fn new(log: DiagnosticLog) -> Self {
        Self {
            synthesis: None,
            recognition: None,
            storage: None,
            touch_points: 0,
            log,
        }
    }

    /// Attach the host's synthesis engine
    #[must_use]
    pub fn with_synthesis(mut self, engine: Arc<dyn SynthesisEngine>) -> Self {
        self.synthesis = Some(engine);
        self
    }

    /// Attach the host's recognition engine
    #[must_use]
    pub fn with_recognition(mut self, engine: Arc<dyn RecognitionEngine>) -> Self {
        self.recognition = Some(engine);
        self
    }

    /// Attach the host's key-value store
    #[must_use]
    pub fn with_storage(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(store);
        self
    }

    /// Report the host's touch point count (0 when unknown)
    #[must_use]
    pub const fn with_touch_points(mut self, touch_points: u32) -> Self {
        self.touch_points = touch_points;
        self
    }

    /// Whether speech synthesis is available
    #[must_use]
    pub fn check_speech_synthesis(&self) -> bool {
        let supported = self.synthesis.is_some();
        self.report("speech synthesis support", supported);
        supported
    }

    /// Whether speech recognition is available
    #[must_use]
    pub fn check_speech_recognition(&self) -> bool {
        let supported = self.recognition.is_some();
        self.report("speech recognition support", supported);
        supported
    }

    /// Whether key-value storage is usable
    ///
    /// Probes with a throwaway write/read/remove cycle. The remove runs
    /// unconditionally so a failing probe never leaves the key behind.
    #[must_use]
    pub fn check_local_storage(&self) -> bool {
        let Some(store) = &self.storage else {
            self.report("storage support", false);
            return false;
        };

        let wrote = store.set(PROBE_KEY, "probe").is_ok();
        let read_back = wrote && matches!(store.get(PROBE_KEY), Ok(Some(_)));
        let _ = store.remove(PROBE_KEY);

        self.report("storage support", read_back);
        read_back
    }

    /// Whether the host has touch input
    #[must_use]
    pub fn check_touch_support(&self) -> bool {
        let supported = self.touch_points > 0;
        self.report("touch support", supported);
        supported
    }

    /// Run all four checks and collect the report
    #[must_use]
    pub fn run_all_checks(&self) -> CapabilityReport {
        CapabilityReport {
            speech_synthesis: self.check_speech_synthesis(),
            speech_recognition: self.check_speech_recognition(),
            local_storage: self.check_local_storage(),
            touch_support: self.check_touch_support(),
        }
    }

    fn report(&self, name: &str, supported: bool) {
        self.log.record(
            if supported { LogLevel::Info } else { LogLevel::Warn },
            COMPAT_CATEGORY,
            name,
            Some(serde_json::json!({ "supported": supported })),
        );
    }
}
