//! Error types for tubeqa.

use crate::transcript::TranscriptError;
use thiserror::Error;

/// A video that is known to have English captions, suggested to users when
/// a transcript could not be obtained.
pub const EXAMPLE_VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

/// Library-level error type for tubeqa operations.
#[derive(Error, Debug)]
pub enum TubeQaError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(#[from] TranscriptError),

    #[error("No video has been processed yet")]
    NoActiveVideo,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    VectorStore(String),

    #[error("RAG error: {0}")]
    Rag(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TubeQaError {
    /// Whether this error came from an embedding, LLM or network provider.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            TubeQaError::Embedding(_)
                | TubeQaError::VectorStore(_)
                | TubeQaError::Rag(_)
                | TubeQaError::OpenAI(_)
                | TubeQaError::Http(_)
        )
    }

    /// User-facing message with a hint about what to try next.
    pub fn guidance(&self) -> String {
        match self {
            TubeQaError::InvalidUrl(_) => "Invalid YouTube URL. Make sure it's a valid YouTube video link \
                 (youtube.com/watch?v=..., youtu.be/..., youtube.com/embed/... or youtube.com/shorts/...)"
                .to_string(),
            TubeQaError::TranscriptUnavailable(cause) => format!(
                "Transcript not found for this video ({}). Possible reasons:\n\n\
                 1. Transcripts disabled - the creator disabled captions\n\
                 2. No auto-generated captions - the video is too short or its language is not supported\n\
                 3. Unsupported language - try videos in English, Spanish or another major language\n\
                 4. Live stream or short video - these usually don't have transcripts\n\n\
                 Try testing with: {}",
                cause, EXAMPLE_VIDEO_URL
            ),
            TubeQaError::NoActiveVideo => {
                "No video processed. Submit a YouTube URL to /process-video first.".to_string()
            }
            TubeQaError::InvalidInput(msg) => msg.clone(),
            e if e.is_provider_failure() => {
                "The language or embedding provider failed to respond. Please try again in a moment."
                    .to_string()
            }
            e => format!("Internal error: {}", e),
        }
    }
}

/// Result type alias for tubeqa operations.
pub type Result<T> = std::result::Result<T, TubeQaError>;
