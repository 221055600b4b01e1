//! `QuizVoice` - voice interaction engine for a children's quiz application
//!
//! This library provides the voice subsystem of the quiz app:
//! - Speech output (emotion-tuned text-to-speech with child-friendly voices)
//! - Speech input (single-shot capture sessions with transcript callbacks)
//! - Spoken-answer matching (transcript to option index)
//! - Host capability detection and a bounded diagnostic log
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   Quiz UI / CLI                      │
//! │  Profile  │  Topics  │  Quiz  │  Results  │  Badges │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                   quizvoice                          │
//! │  SpeechOutput │ SpeechInput │ Matcher │ Capability  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │            Host speech engines (pluggable)           │
//! │   SynthesisEngine  │  RecognitionEngine  │  Store   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Quiz content itself comes from an external backend (see [`client`]); the
//! voice subsystem only consumes its text fields.

pub mod achievements;
pub mod capability;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod voice;

pub use achievements::{Achievement, AchievementTracker, QuizStats, Rarity};
pub use capability::{
    CapabilityDetector, CapabilityReport, FailingStore, KeyValueStore, MemoryStore,
};
pub use client::{AnswerOutcome, Profile, Question, QuizClient, QuizSession};
pub use config::Config;
pub use diagnostics::{DiagnosticLog, LogEntry, LogLevel};
pub use error::{Error, Result};
pub use voice::{
    match_transcript, Emotion, RecognitionEngine, SessionConfig, SpeakOptions, SpeechInput,
    SpeechOutput, SynthesisEngine, Utterance, VoiceInfo,
};
