//! Speech input controller
//!
//! Captures one spoken utterance per session and delivers its single final
//! transcript through a result callback. Only one session may be active per
//! controller; a second `start_listening` while active is rejected. Every
//! session ends back in the idle state via result, error, stop, or abort.

use std::sync::{Arc, Mutex};

use super::engine::{
    EventSink, RecognitionEngine, RecognitionEvent, RecognitionFailure, SessionConfig,
};
use crate::diagnostics::DiagnosticLog;

/// Guidance used when the host has no recognition capability
const UNSUPPORTED_REASON: &str =
    "Speech recognition is not supported on this device. Please tap your answer instead.";

/// State of a capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session active
    Idle,
    /// Capturing audio
    Listening,
}

/// Callbacks fired over a session's lifetime
///
/// All failures arrive through `on_error` as a short human-readable reason;
/// nothing in the controller panics or propagates into the caller.
#[derive(Default)]
pub struct SessionCallbacks {
    on_start: Option<Box<dyn FnMut() + Send>>,
    on_result: Option<Box<dyn FnMut(&str) + Send>>,
    on_error: Option<Box<dyn FnMut(&str) + Send>>,
    on_end: Option<Box<dyn FnMut() + Send>>,
}

struct Shared {
    state: Mutex<SessionState>,
    transcript: Mutex<Option<String>>,
    callbacks: Mutex<SessionCallbacks>,
    log: DiagnosticLog,
}

impl Shared {
    fn set_state(&self, state: SessionState) {
        if let Ok(mut current) = self.state.lock() {
            *current = state;
        }
    }

    fn state(&self) -> SessionState {
        self.state.lock().map_or(SessionState::Idle, |state| *state)
    }

    // Callbacks are taken out of the lock before invocation so a callback
    // that calls back into the controller cannot deadlock on the callback
    // mutex.
    fn fire_start(&self) {
        let taken = self.callbacks.lock().ok().and_then(|mut c| c.on_start.take());
        if let Some(mut callback) = taken {
            callback();
            if let Ok(mut c) = self.callbacks.lock() {
                if c.on_start.is_none() {
                    c.on_start = Some(callback);
                }
            }
        }
    }

    fn fire_result(&self, transcript: &str) {
        let taken = self.callbacks.lock().ok().and_then(|mut c| c.on_result.take());
        if let Some(mut callback) = taken {
            callback(transcript);
            if let Ok(mut c) = self.callbacks.lock() {
                if c.on_result.is_none() {
                    c.on_result = Some(callback);
                }
            }
        }
    }

    fn fire_error(&self, reason: &str) {
        let taken = self.callbacks.lock().ok().and_then(|mut c| c.on_error.take());
        if let Some(mut callback) = taken {
            callback(reason);
            if let Ok(mut c) = self.callbacks.lock() {
                if c.on_error.is_none() {
                    c.on_error = Some(callback);
                }
            }
        }
    }

    fn fire_end(&self) {
        let taken = self.callbacks.lock().ok().and_then(|mut c| c.on_end.take());
        if let Some(mut callback) = taken {
            callback();
            if let Ok(mut c) = self.callbacks.lock() {
                if c.on_end.is_none() {
                    c.on_end = Some(callback);
                }
            }
        }
    }

    fn handle_event(&self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Start => {
                self.log.voice_event("recognition session started");
                self.fire_start();
            }
            RecognitionEvent::Result(transcript) => {
                self.log.voice_event(&format!(
                    "recognition result: {} chars",
                    transcript.len()
                ));
                if let Ok(mut stored) = self.transcript.lock() {
                    *stored = Some(transcript.clone());
                }
                self.fire_result(&transcript);
            }
            RecognitionEvent::Error(failure) => {
                self.set_state(SessionState::Idle);
                let reason = failure.to_string();
                self.log.voice_error(&reason);
                self.fire_error(&reason);
            }
            RecognitionEvent::End => {
                self.set_state(SessionState::Idle);
                self.log.voice_event("recognition session ended");
                self.fire_end();
            }
        }
    }
}

/// Captures spoken answers through a pluggable recognition engine
pub struct SpeechInput {
    engine: Option<Arc<dyn RecognitionEngine>>,
    config: SessionConfig,
    shared: Arc<Shared>,
}

impl SpeechInput {
    /// Create a controller over an optional engine
    ///
    /// A `None` engine yields a permanently unsupported controller whose
    /// `start_listening` fails fast through the error callback.
    #[must_use]
    pub fn new(engine: Option<Arc<dyn RecognitionEngine>>, log: DiagnosticLog) -> Self {
        Self {
            engine,
            config: SessionConfig::default(),
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState::Idle),
                transcript: Mutex::new(None),
                callbacks: Mutex::new(SessionCallbacks::default()),
                log,
            }),
        }
    }

    /// Override the session configuration (language, continuous flag)
    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the callback fired when a session begins
    pub fn on_start(&self, callback: impl FnMut() + Send + 'static) {
        if let Ok(mut callbacks) = self.shared.callbacks.lock() {
            callbacks.on_start = Some(Box::new(callback));
        }
    }

    /// Set the callback receiving the session's final transcript
    pub fn on_result(&self, callback: impl FnMut(&str) + Send + 'static) {
        if let Ok(mut callbacks) = self.shared.callbacks.lock() {
            callbacks.on_result = Some(Box::new(callback));
        }
    }

    /// Set the callback receiving human-readable failure reasons
    pub fn on_error(&self, callback: impl FnMut(&str) + Send + 'static) {
        if let Ok(mut callbacks) = self.shared.callbacks.lock() {
            callbacks.on_error = Some(Box::new(callback));
        }
    }

    /// Set the callback fired when a session ends, exactly once per session
    pub fn on_end(&self, callback: impl FnMut() + Send + 'static) {
        if let Ok(mut callbacks) = self.shared.callbacks.lock() {
            callbacks.on_end = Some(Box::new(callback));
        }
    }

    /// Begin a single capture session
    ///
    /// Returns false without starting anything if the host has no
    /// recognition capability (the error callback fires with guidance) or if
    /// a session is already active.
    #[must_use]
    pub fn start_listening(&self) -> bool {
        let Some(engine) = &self.engine else {
            self.shared.log.voice_error(UNSUPPORTED_REASON);
            self.shared.fire_error(UNSUPPORTED_REASON);
            return false;
        };

        // One session at a time: mark active before dispatch so even an
        // engine that completes synchronously never observes two sessions.
        {
            let Ok(mut state) = self.shared.state.lock() else {
                return false;
            };
            if *state == SessionState::Listening {
                self.shared.log.voice_event("start ignored: already listening");
                return false;
            }
            *state = SessionState::Listening;
        }

        if let Ok(mut transcript) = self.shared.transcript.lock() {
            *transcript = None;
        }

        let shared = Arc::clone(&self.shared);
        let sink: EventSink = Arc::new(move |event| shared.handle_event(event));

        match engine.start(&self.config, sink) {
            Ok(()) => {
                self.shared.log.voice_event(&format!(
                    "listening started (language {}, continuous {})",
                    self.config.language, self.config.continuous
                ));
                true
            }
            Err(e) => {
                self.shared.set_state(SessionState::Idle);
                let reason = RecognitionFailure::Engine(e.to_string()).to_string();
                self.shared.log.voice_error(&reason);
                self.shared.fire_error(&reason);
                false
            }
        }
    }

    /// End the session normally, delivering any pending result
    ///
    /// No-op when nothing is active.
    pub fn stop_listening(&self) {
        if !self.is_listening() {
            return;
        }
        if let Some(engine) = &self.engine {
            engine.stop();
            self.shared.log.voice_event("listening stopped");
        }
    }

    /// Cancel the session, discarding any partial result
    ///
    /// No-op when nothing is active.
    pub fn abort_listening(&self) {
        if !self.is_listening() {
            return;
        }
        self.reset_transcript();
        if let Some(engine) = &self.engine {
            engine.abort();
            self.shared.log.voice_event("listening aborted");
        }
    }

    /// Whether a session is currently active
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.shared.state() == SessionState::Listening
    }

    /// Whether the host has a recognition capability at all
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.engine.is_some()
    }

    /// Final transcript of the most recent session, if one was delivered
    #[must_use]
    pub fn transcript(&self) -> Option<String> {
        self.shared
            .transcript
            .lock()
            .ok()
            .and_then(|transcript| transcript.clone())
    }

    /// Discard any stored transcript
    pub fn reset_transcript(&self) {
        if let Ok(mut transcript) = self.shared.transcript.lock() {
            *transcript = None;
        }
    }

    /// Session configuration in effect
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }
}
