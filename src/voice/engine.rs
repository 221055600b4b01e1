//! Speech engine abstraction
//!
//! The controllers never talk to a concrete speech stack directly. A host
//! plugs a platform synthesis/recognition implementation in behind these
//! traits; the shipped implementations cover the console (for the CLI) and
//! deterministic test doubles, so the controllers are testable without an
//! audio or microphone stack.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::{Error, Result};

/// A voice available from a synthesis engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    /// Engine-reported voice name
    pub name: String,
    /// Language tag (e.g. "en-US")
    pub language: String,
}

impl VoiceInfo {
    /// Create a voice descriptor
    #[must_use]
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }
}

/// One discrete text-to-speech playback request
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Text to speak, already sanitized by the controller
    pub text: String,
    /// Selected voice name, if any
    pub voice: Option<String>,
    /// Speaking rate multiplier
    pub rate: f32,
    /// Voice pitch multiplier
    pub pitch: f32,
    /// Playback volume, 0.0 to 1.0
    pub volume: f32,
}

/// Dispatches utterances to a speech synthesis backend
pub trait SynthesisEngine: Send + Sync {
    /// Currently available voices
    fn voices(&self) -> Vec<VoiceInfo>;

    /// Dispatch one utterance
    ///
    /// Playback is fire-and-forget relative to the caller.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the utterance
    fn speak(&self, utterance: &Utterance) -> Result<()>;

    /// Cancel any in-flight utterance
    fn cancel(&self);
}

/// Why a recognition session failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionFailure {
    /// Silence timeout with no usable speech
    NoSpeech,
    /// Microphone permission denied
    NotAllowed,
    /// Network problem in the recognition backend
    Network,
    /// Session cancelled before completion
    Aborted,
    /// Any other engine-reported failure
    Engine(String),
}

impl fmt::Display for RecognitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpeech => write!(f, "No speech was detected. Please try again."),
            Self::NotAllowed => write!(
                f,
                "Microphone access was denied. Please allow the microphone and try again."
            ),
            Self::Network => write!(
                f,
                "A network problem interrupted listening. Please try again."
            ),
            Self::Aborted => write!(f, "Listening was cancelled."),
            Self::Engine(reason) => write!(f, "Speech recognition error: {reason}"),
        }
    }
}

/// Event delivered by a recognition engine during a capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// The session began capturing audio
    Start,
    /// The single final transcript for this session
    Result(String),
    /// The session failed
    Error(RecognitionFailure),
    /// The session ended; fires exactly once per session
    End,
}

/// Sink through which an engine reports session events
pub type EventSink = Arc<dyn Fn(RecognitionEvent) + Send + Sync>;

/// Settings for one capture session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Recognition language tag
    pub language: String,
    /// Keep capturing after the first final result
    pub continuous: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: false,
        }
    }
}

/// Captures speech and reports events for one session at a time
pub trait RecognitionEngine: Send + Sync {
    /// Begin a capture session, delivering events through `events`
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be started
    fn start(&self, config: &SessionConfig, events: EventSink) -> Result<()>;

    /// Finalize the session normally, delivering any pending result
    fn stop(&self);

    /// Cancel the session, discarding any partial result
    fn abort(&self);
}

/// Synthesis engine that prints utterances to stdout instead of producing audio
///
/// Used by the CLI so the quiz flow works on hosts without a speech stack.
pub struct ConsoleSynthesis {
    voices: Vec<VoiceInfo>,
}

impl ConsoleSynthesis {
    /// Create a console engine with a small fixed voice catalog
    #[must_use]
    pub fn new() -> Self {
        Self {
            voices: vec![
                VoiceInfo::new("Samantha", "en-US"),
                VoiceInfo::new("Karen", "en-AU"),
                VoiceInfo::new("Daniel", "en-GB"),
            ],
        }
    }
}

impl Default for ConsoleSynthesis {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthesisEngine for ConsoleSynthesis {
    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    fn speak(&self, utterance: &Utterance) -> Result<()> {
        let voice = utterance.voice.as_deref().unwrap_or("default");
        println!(
            "[{voice} r={:.1} p={:.1}] {}",
            utterance.rate, utterance.pitch, utterance.text
        );
        Ok(())
    }

    fn cancel(&self) {}
}

/// Call recorded by [`CapturingSynthesis`], in dispatch order
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisCall {
    /// `cancel()` was invoked
    Cancel,
    /// `speak()` was invoked with this utterance
    Speak(Utterance),
}

/// Synthesis engine that records every call instead of speaking
///
/// The deterministic test double for the output controller; also usable by
/// headless hosts that only want the spoken text.
#[derive(Default)]
pub struct CapturingSynthesis {
    voices: Vec<VoiceInfo>,
    calls: Mutex<Vec<SynthesisCall>>,
    failing: AtomicBool,
}

impl CapturingSynthesis {
    /// Create an engine exposing the given voice catalog
    #[must_use]
    pub fn with_voices(voices: Vec<VoiceInfo>) -> Self {
        Self {
            voices,
            calls: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `speak` call fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All recorded calls, in order
    #[must_use]
    pub fn calls(&self) -> Vec<SynthesisCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Only the dispatched utterances, in order
    #[must_use]
    pub fn utterances(&self) -> Vec<Utterance> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SynthesisCall::Speak(utterance) => Some(utterance),
                SynthesisCall::Cancel => None,
            })
            .collect()
    }

    /// Number of `cancel` calls seen
    #[must_use]
    pub fn cancel_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, SynthesisCall::Cancel))
            .count()
    }

    fn push(&self, call: SynthesisCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl SynthesisEngine for CapturingSynthesis {
    fn voices(&self) -> Vec<VoiceInfo> {
        self.voices.clone()
    }

    fn speak(&self, utterance: &Utterance) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Synthesis("scripted dispatch failure".to_string()));
        }
        self.push(SynthesisCall::Speak(utterance.clone()));
        Ok(())
    }

    fn cancel(&self) {
        self.push(SynthesisCall::Cancel);
    }
}

/// Outcome replayed by a [`ScriptedRecognition`] session
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Deliver this final transcript
    Transcript(String),
    /// Fail with this reason
    Failure(RecognitionFailure),
}

/// Recognition engine that replays a scripted outcome
///
/// In immediate mode the whole session plays out inside `start`. In held
/// mode the session stays open until `stop` (deliver the outcome) or
/// `abort` (end without a result), which lets tests observe the
/// one-session-at-a-time guard.
pub struct ScriptedRecognition {
    outcome: ScriptedOutcome,
    deliver_on_start: bool,
    session: Mutex<Option<EventSink>>,
    starts: AtomicUsize,
}

impl ScriptedRecognition {
    /// Session that completes inside `start`
    #[must_use]
    pub fn immediate(outcome: ScriptedOutcome) -> Self {
        Self {
            outcome,
            deliver_on_start: true,
            session: Mutex::new(None),
            starts: AtomicUsize::new(0),
        }
    }

    /// Session that stays open until `stop` or `abort`
    #[must_use]
    pub fn held(outcome: ScriptedOutcome) -> Self {
        Self {
            outcome,
            deliver_on_start: false,
            session: Mutex::new(None),
            starts: AtomicUsize::new(0),
        }
    }

    /// Number of sessions started so far
    #[must_use]
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    fn deliver(&self, sink: &EventSink) {
        match &self.outcome {
            ScriptedOutcome::Transcript(text) => {
                sink(RecognitionEvent::Result(text.clone()));
                sink(RecognitionEvent::End);
            }
            ScriptedOutcome::Failure(failure) => {
                sink(RecognitionEvent::Error(failure.clone()));
                sink(RecognitionEvent::End);
            }
        }
    }

    fn take_session(&self) -> Option<EventSink> {
        self.session.lock().ok().and_then(|mut session| session.take())
    }
}

impl RecognitionEngine for ScriptedRecognition {
    fn start(&self, _config: &SessionConfig, events: EventSink) -> Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        events(RecognitionEvent::Start);

        if self.deliver_on_start {
            self.deliver(&events);
        } else if let Ok(mut session) = self.session.lock() {
            *session = Some(events);
        }
        Ok(())
    }

    fn stop(&self) {
        if let Some(sink) = self.take_session() {
            self.deliver(&sink);
        }
    }

    fn abort(&self) {
        if let Some(sink) = self.take_session() {
            sink(RecognitionEvent::End);
        }
    }
}
