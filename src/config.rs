//! Configuration management for `QuizVoice`

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// `QuizVoice` configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Voice subsystem settings
    pub voice: VoiceSettings,

    /// Quiz backend settings
    pub api: ApiConfig,
}

/// Voice subsystem settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// Enable spoken prompts and voice capture
    pub enabled: bool,

    /// Recognition language tag
    pub language: String,

    /// Default speaking rate
    pub rate: f32,

    /// Default pitch
    pub pitch: f32,

    /// Exact voice name to select, overriding the child-friendly heuristic
    pub preferred_voice: Option<String>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "en-US".to_string(),
            rate: 0.9,
            pitch: 1.1,
            preferred_voice: None,
        }
    }
}

/// Quiz backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the quiz-generation backend
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location plus env overrides
    ///
    /// Reads `<config dir>/quizvoice/config.toml` when it exists, then
    /// applies `QUIZVOICE_API_URL`, `QUIZVOICE_LANGUAGE`, `QUIZVOICE_VOICE`,
    /// and `QUIZVOICE_DISABLE_VOICE`. Everything is optional.
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be read or parsed
    pub fn load() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from an explicit TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = toml::from_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("QUIZVOICE_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(language) = std::env::var("QUIZVOICE_LANGUAGE") {
            self.voice.language = language;
        }
        if let Ok(voice) = std::env::var("QUIZVOICE_VOICE") {
            self.voice.preferred_voice = Some(voice);
        }
        if std::env::var("QUIZVOICE_DISABLE_VOICE")
            .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        {
            self.voice.enabled = false;
        }
    }
}

/// Default config file path (`~/.config/quizvoice/config.toml` on Linux)
fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "quizvoice", "quizvoice")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
