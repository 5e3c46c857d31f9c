//! Client construction for OpenAI-compatible APIs (OpenAI, Groq, ...).

use crate::error::{Result, TubeQaError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for API requests (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection parameters for an OpenAI-compatible endpoint.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Base URL; `None` uses api.openai.com.
    pub api_base: Option<String>,
    /// Name of the environment variable holding the API key.
    pub api_key_env: Option<String>,
    /// Request timeout.
    pub timeout: Option<Duration>,
}

/// Create a client for the given endpoint.
pub fn create_client(options: &ClientOptions) -> Result<Client<OpenAIConfig>> {
    let timeout = options
        .timeout
        .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TubeQaError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::default();
    if let Some(base) = options.api_base.as_deref().filter(|b| !b.is_empty()) {
        config = config.with_api_base(base);
    }
    if let Some(var) = options.api_key_env.as_deref().filter(|v| !v.is_empty()) {
        if let Ok(key) = std::env::var(var) {
            config = config.with_api_key(key);
        }
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}
