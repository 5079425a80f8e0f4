//! Error types for ytchat.

use thiserror::Error;

/// Library-level error type for ytchat operations.
#[derive(Error, Debug)]
pub enum YtChatError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Indexing error: {0}")]
    Indexing(String),

    #[error("{0}")]
    NotFound(String),

    #[error("LLM request failed: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl YtChatError {
    /// Whether this error is the caller's fault for asking about an unknown video.
    pub fn is_not_found(&self) -> bool {
        matches!(self, YtChatError::NotFound(_))
    }
}

/// Result type alias for ytchat operations.
pub type Result<T> = std::result::Result<T, YtChatError>;
