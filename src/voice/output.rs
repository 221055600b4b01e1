//! Speech output controller
//!
//! Converts quiz text into spoken feedback tuned for a young audience:
//! slightly slower, slightly higher-pitched, always encouraging. At most one
//! utterance is speaking at a time; every dispatch cancels whatever came
//! before it. A missing engine, an empty voice catalog, or a backend failure
//! downgrades to a logged no-op so a missed prompt never blocks the quiz.

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::engine::{SynthesisEngine, Utterance, VoiceInfo};
use crate::diagnostics::DiagnosticLog;
use crate::Error;

/// Default speaking rate, slightly slower for clarity
const DEFAULT_RATE: f32 = 0.9;

/// Default pitch, slightly higher for friendliness
const DEFAULT_PITCH: f32 = 1.1;

/// Name fragments that mark a voice as child-friendly
const PREFERRED_VOICE_HINTS: [&str; 5] = ["female", "samantha", "karen", "veena", "zira"];

/// Phrases appended to encouraging and celebration speech
const ENCOURAGEMENT_PHRASES: [&str; 5] = [
    "You're doing great!",
    "Keep up the awesome work!",
    "You're so smart!",
    "Way to go, superstar!",
    "Learning is fun with you!",
];

/// Coarse tone selector mapping to a fixed rate/pitch pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    /// High energy, fast
    Excited,
    /// Warm, supportive
    Encouraging,
    /// Calm, soft
    Gentle,
    /// Peak enthusiasm
    Celebration,
}

impl Emotion {
    /// (rate, pitch) pair used unless the caller overrides
    #[must_use]
    pub const fn prosody(self) -> (f32, f32) {
        match self {
            Self::Excited => (1.1, 1.3),
            Self::Celebration => (1.0, 1.4),
            Self::Encouraging => (0.9, 1.2),
            Self::Gentle => (0.8, 1.0),
        }
    }

    /// Whether this emotion gets an encouragement phrase appended
    const fn wants_encouragement(self) -> bool {
        matches!(self, Self::Encouraging | Self::Celebration)
    }
}

impl FromStr for Emotion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "excited" => Ok(Self::Excited),
            "encouraging" => Ok(Self::Encouraging),
            "gentle" => Ok(Self::Gentle),
            "celebration" => Ok(Self::Celebration),
            other => Err(Error::Config(format!("unknown emotion: {other}"))),
        }
    }
}

/// Options for a single speak call
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeakOptions {
    /// Rate override; defaults to 0.9 or the emotion's rate
    pub rate: Option<f32>,
    /// Pitch override; defaults to 1.1 or the emotion's pitch
    pub pitch: Option<f32>,
    /// Tone selector
    pub emotion: Option<Emotion>,
}

impl SpeakOptions {
    /// Options carrying only an emotion tag
    #[must_use]
    pub const fn with_emotion(emotion: Emotion) -> Self {
        Self {
            rate: None,
            pitch: None,
            emotion: Some(emotion),
        }
    }
}

/// Speaks application text through a pluggable synthesis engine
pub struct SpeechOutput {
    engine: Option<Arc<dyn SynthesisEngine>>,
    voices: Vec<VoiceInfo>,
    selected: Option<VoiceInfo>,
    rng: Mutex<StdRng>,
    log: DiagnosticLog,
}

impl SpeechOutput {
    /// Create a controller over an optional engine
    ///
    /// Loads the voice catalog and selects a child-friendly voice. A `None`
    /// engine yields a controller whose speak calls are logged no-ops.
    #[must_use]
    pub fn new(engine: Option<Arc<dyn SynthesisEngine>>, log: DiagnosticLog) -> Self {
        let mut output = Self {
            engine,
            voices: Vec::new(),
            selected: None,
            rng: Mutex::new(StdRng::from_entropy()),
            log,
        };
        output.refresh_voices();
        output
    }

    /// Replace the phrase-selection RNG with a seeded one, for deterministic output
    #[must_use]
    pub fn with_rng_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Reload the voice catalog and re-derive the selected voice
    ///
    /// Call when the host signals that the engine's voice catalog changed.
    pub fn refresh_voices(&mut self) {
        self.voices = self
            .engine
            .as_ref()
            .map(|engine| engine.voices())
            .unwrap_or_default();
        self.selected = pick_voice(&self.voices);

        self.log.voice_event(&format!(
            "voice catalog loaded: {} voices, selected {:?}",
            self.voices.len(),
            self.selected.as_ref().map(|v| v.name.as_str())
        ));
    }

    /// Speak text, cancelling any in-flight utterance first
    ///
    /// Emoji and pictographic symbols are stripped before dispatch so the
    /// synthesizer never reads them aloud. Encouraging and celebration
    /// emotions get one randomly chosen encouragement phrase appended.
    pub fn speak(&self, text: &str, options: &SpeakOptions) {
        let Some(engine) = &self.engine else {
            self.log.voice_error("speech synthesis unavailable, skipping utterance");
            return;
        };
        if self.voices.is_empty() {
            self.log.voice_error("no voices available, skipping utterance");
            return;
        }

        // At-most-one-speaking invariant
        engine.cancel();

        let mut spoken = strip_symbols(text);
        if let Some(phrase) = self.encouragement_for(options.emotion) {
            spoken.push(' ');
            spoken.push_str(phrase);
        }

        let (base_rate, base_pitch) = options
            .emotion
            .map_or((DEFAULT_RATE, DEFAULT_PITCH), Emotion::prosody);

        let utterance = Utterance {
            text: spoken,
            voice: self.selected.as_ref().map(|v| v.name.clone()),
            rate: options.rate.unwrap_or(base_rate),
            pitch: options.pitch.unwrap_or(base_pitch),
            volume: 1.0,
        };

        if let Err(e) = engine.speak(&utterance) {
            self.log.voice_error(&format!("speech dispatch failed: {e}"));
        } else {
            self.log.voice_event(&format!("speaking {} chars", utterance.text.len()));
        }
    }

    /// Announce a correct answer with celebration tone
    pub fn speak_correct_answer(&self, explanation: &str) {
        self.speak(
            &format!("Correct! {explanation}"),
            &SpeakOptions::with_emotion(Emotion::Celebration),
        );
    }

    /// Announce an incorrect answer with an encouraging tone
    pub fn speak_incorrect_answer(&self, explanation: &str) {
        self.speak(
            &format!("That's okay! {explanation} Keep trying, you're learning so much!"),
            &SpeakOptions::with_emotion(Emotion::Encouraging),
        );
    }

    /// Announce the final score, congratulating at a matching intensity
    pub fn speak_quiz_complete(&self, score: u32, total: u32) {
        if total == 0 {
            self.log.voice_error("quiz completion announced with zero questions");
            return;
        }
        self.speak(
            &completion_message(score, total),
            &SpeakOptions::with_emotion(Emotion::Celebration),
        );
    }

    /// Cancel in-flight speech unconditionally
    pub fn stop(&self) {
        if let Some(engine) = &self.engine {
            engine.cancel();
            self.log.voice_event("speech stopped");
        }
    }

    /// Switch to the voice with this exact name, if it exists in the catalog
    pub fn set_voice(&mut self, name: &str) {
        if let Some(voice) = self.voices.iter().find(|v| v.name == name) {
            self.selected = Some(voice.clone());
            self.log.voice_event(&format!("voice switched to {name}"));
        }
    }

    /// All voices from the last catalog load
    #[must_use]
    pub fn available_voices(&self) -> &[VoiceInfo] {
        &self.voices
    }

    /// Currently selected voice
    #[must_use]
    pub fn selected_voice(&self) -> Option<&VoiceInfo> {
        self.selected.as_ref()
    }

    /// Whether a synthesis engine is attached
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.engine.is_some()
    }

    fn encouragement_for(&self, emotion: Option<Emotion>) -> Option<&'static str> {
        if !emotion.is_some_and(Emotion::wants_encouragement) {
            return None;
        }
        let index = self
            .rng
            .lock()
            .map_or(0, |mut rng| rng.gen_range(0..ENCOURAGEMENT_PHRASES.len()));
        Some(ENCOURAGEMENT_PHRASES[index])
    }
}

/// Pick the first child-friendly voice, falling back to the first voice
fn pick_voice(voices: &[VoiceInfo]) -> Option<VoiceInfo> {
    voices
        .iter()
        .find(|voice| {
            let name = voice.name.to_lowercase();
            PREFERRED_VOICE_HINTS.iter().any(|hint| name.contains(hint))
        })
        .or_else(|| voices.first())
        .cloned()
}

/// Message tiers for the final score announcement
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn completion_message(score: u32, total: u32) -> String {
    let percentage = (f64::from(score) * 100.0 / f64::from(total)).round() as u32;

    if percentage == 100 {
        format!("Perfect score! You got all {total} questions right! You're absolutely amazing!")
    } else if percentage >= 80 {
        format!("Excellent work! You got {score} out of {total} questions right! You're a superstar!")
    } else if percentage >= 60 {
        format!(
            "Great job! You got {score} out of {total} questions right! Keep practicing and you'll get even better!"
        )
    } else {
        format!(
            "Good effort! You got {score} out of {total} questions right! Every quiz makes you smarter!"
        )
    }
}

/// Remove emoji and pictographic symbols so they are never read aloud
#[must_use]
pub fn strip_symbols(text: &str) -> String {
    text.chars().filter(|&c| !is_symbol(c)).collect()
}

const fn is_symbol(c: char) -> bool {
    matches!(c,
        '\u{1F1E6}'..='\u{1F1FF}'   // regional indicators
        | '\u{1F300}'..='\u{1F5FF}' // symbols and pictographs
        | '\u{1F600}'..='\u{1F64F}' // emoticons
        | '\u{1F680}'..='\u{1F6FF}' // transport and map
        | '\u{1F700}'..='\u{1F77F}' // alchemical
        | '\u{1F900}'..='\u{1F9FF}' // supplemental symbols
        | '\u{1FA70}'..='\u{1FAFF}' // extended pictographs
        | '\u{2600}'..='\u{26FF}'   // miscellaneous symbols
        | '\u{2700}'..='\u{27BF}'   // dingbats
        | '\u{2B00}'..='\u{2BFF}'   // arrows and stars
        | '\u{FE00}'..='\u{FE0F}'   // variation selectors
        | '\u{200D}'                // zero-width joiner
    )
}
