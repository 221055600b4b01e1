//! Shared test utilities
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use quizvoice::voice::{CapturingSynthesis, VoiceInfo};
use quizvoice::DiagnosticLog;

/// Voice descriptor shorthand
#[must_use]
pub fn voice(name: &str, language: &str) -> VoiceInfo {
    VoiceInfo::new(name, language)
}

/// Capturing engine with a typical desktop voice catalog
#[must_use]
pub fn capturing_engine() -> Arc<CapturingSynthesis> {
    Arc::new(CapturingSynthesis::with_voices(vec![
        voice("Daniel", "en-GB"),
        voice("Samantha", "en-US"),
        voice("Alex", "en-US"),
    ]))
}

/// Fresh diagnostic log
#[must_use]
pub fn test_log() -> DiagnosticLog {
    DiagnosticLog::new()
}

/// Shared event recorder for callback assertions
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events
            .lock()
            .expect("event recorder lock")
            .push(event.into());
    }

    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("event recorder lock").clone()
    }
}
