//! Error types for `QuizVoice`

use thiserror::Error;

/// Result type alias for `QuizVoice` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `QuizVoice`
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Speech synthesis error
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Speech recognition error
    #[error("recognition error: {0}")]
    Recognition(String),

    /// Key-value storage error
    #[error("storage error: {0}")]
    Storage(String),

    /// Quiz backend API error
    #[error("quiz API error: {0}")]
    Api(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
