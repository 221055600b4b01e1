//! Voice interaction subsystem
//!
//! Speech output, speech capture, and spoken-answer matching for the quiz.
//! Concrete speech stacks plug in behind the engine traits (see `engine`);
//! the controllers own session state and the fail-soft behavior.

mod engine;
mod input;
mod matcher;
mod output;

pub use engine::{
    CapturingSynthesis, ConsoleSynthesis, EventSink, RecognitionEngine, RecognitionEvent,
    RecognitionFailure, ScriptedOutcome, ScriptedRecognition, SessionConfig, SynthesisCall,
    SynthesisEngine, Utterance, VoiceInfo,
};
pub use input::{SessionState, SpeechInput};
pub use matcher::match_transcript;
pub use output::{strip_symbols, Emotion, SpeakOptions, SpeechOutput};
