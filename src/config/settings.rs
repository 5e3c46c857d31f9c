//! Configuration settings for tubeqa.

use crate::error::{Result, TubeQaError};
use crate::transcript::DEFAULT_PREFERRED_LANGUAGES;
use crate::vector_store::DEFAULT_TOP_K;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable overriding the answer model.
pub const RAG_MODEL_ENV: &str = "GROQ_MODEL";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub transcript: TranscriptSettings,
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub rag: RagSettings,
    pub prompts: PromptSettings,
}

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Transcript fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Language codes preferred when picking a caption track.
    pub preferred_languages: Vec<String>,
    /// Timeout for each request to YouTube, in seconds.
    pub request_timeout_secs: u64,
    /// `Accept-Language` header sent to YouTube.
    pub accept_language: String,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            preferred_languages: DEFAULT_PREFERRED_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            request_timeout_secs: 30,
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Transcript chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Target chunk size in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai, hashing).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Base URL of an OpenAI-compatible API (default: api.openai.com).
    pub api_base: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            api_base: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Answer synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// LLM model for answer generation.
    pub model: String,
    /// Base URL of an OpenAI-compatible chat API.
    pub api_base: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Timeout for each completion request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            api_base: Some("https://api.groq.com/openai/v1".to_string()),
            api_key_env: "GROQ_API_KEY".to_string(),
            temperature: 0.2,
            top_k: DEFAULT_TOP_K,
            request_timeout_secs: 120,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// `GROQ_MODEL`, when set, overrides `rag.model`.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        Self::load_with_env(path, |name| std::env::var(name).ok())
    }

    fn load_with_env<F>(path: Option<&PathBuf>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings: Settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        if let Some(model) = lookup(RAG_MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            settings.rag.model = model;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(TubeQaError::Config("chunking.chunk_size must be greater than 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(TubeQaError::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.rag.top_k == 0 {
            return Err(TubeQaError::Config("rag.top_k must be greater than 0".to_string()));
        }
        if self.embedding.dimensions == 0 {
            return Err(TubeQaError::Config("embedding.dimensions must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| TubeQaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubeqa")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.chunk_size, 1000);
        assert_eq!(settings.chunking.chunk_overlap, 100);
        assert_eq!(settings.rag.top_k, 3);
        assert_eq!(settings.transcript.preferred_languages, vec!["en", "hi", "es", "fr", "de"]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.server.port, 8000);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[chunking]\nchunk_size = 500\n\n[embedding]\nprovider = \"hashing\"\ndimensions = 256\n",
        )
        .unwrap();

        let settings = Settings::load_with_env(Some(&path), |_| None).unwrap();
        assert_eq!(settings.chunking.chunk_size, 500);
        assert_eq!(settings.chunking.chunk_overlap, 100);
        assert_eq!(settings.embedding.provider, "hashing");
        assert_eq!(settings.rag.model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_invalid_overlap_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chunking]\nchunk_size = 100\nchunk_overlap = 100\n").unwrap();

        assert!(matches!(Settings::load_from(Some(&path)), Err(TubeQaError::Config(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut settings = Settings::default();
        settings.server.port = 9000;

        settings.save_to(&path).unwrap();
        let reloaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(reloaded.server.port, 9000);
    }

    #[test]
    fn test_model_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[rag]\nmodel = \"from-file\"\n").unwrap();

        let settings = Settings::load_with_env(Some(&path), |name| {
            (name == "GROQ_MODEL").then(|| "llama-3.1-8b-instant".to_string())
        })
        .unwrap();
        assert_eq!(settings.rag.model, "llama-3.1-8b-instant");

        let settings = Settings::load_with_env(Some(&path), |_| Some("  ".to_string())).unwrap();
        assert_eq!(settings.rag.model, "from-file");
    }
}
