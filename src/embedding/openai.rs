//! OpenAI embeddings implementation.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{Result, TubeQaError};
use crate::openai::{create_client, ClientOptions};
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, instrument};

/// OpenAI has a limit on inputs per request.
const BATCH_SIZE: usize = 100;

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder for an existing client.
    pub fn with_client(client: Client<OpenAIConfig>, model: &str, dimensions: usize) -> Self {
        Self {
            client,
            model: model.to_string(),
            dimensions,
        }
    }

    /// Create an embedder from settings.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        let client = create_client(&ClientOptions {
            api_base: settings.api_base.clone(),
            api_key_env: Some(settings.api_key_env.clone()),
            timeout: None,
        })?;
        Ok(Self::with_client(client, &settings.model, settings.dimensions as usize))
    }

    async fn embed_request(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(input))
            .dimensions(self.dimensions as u32)
            .build()
            .map_err(|e| TubeQaError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| TubeQaError::OpenAI(format!("Embedding API error: {}", e)))?;

        // Sort by index to ensure correct order
        let mut data = response.data;
        data.sort_by_key(|e| e.index);
        Ok(data.into_iter().map(|e| e.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| TubeQaError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let batches = texts.chunks(BATCH_SIZE).map(|chunk| self.embed_request(chunk.to_vec()));
        let embeddings: Vec<Vec<f32>> = try_join_all(batches).await?.into_iter().flatten().collect();

        debug!("Generated {} embeddings", embeddings.len());
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
