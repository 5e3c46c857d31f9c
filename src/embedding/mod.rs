//! Embedding generation for similarity retrieval.

mod hashing;
mod openai;

pub use hashing::HashingEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::EmbeddingSettings;
use crate::error::{Result, TubeQaError};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for embedding generation.
///
/// Implementations must be deterministic: the same text always maps to the
/// same vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}

/// Create the embedder selected by the settings.
pub fn create_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    match settings.provider.to_lowercase().as_str() {
        "openai" => Ok(Arc::new(OpenAIEmbedder::from_settings(settings)?)),
        "hashing" => Ok(Arc::new(HashingEmbedder::new(settings.dimensions as usize))),
        other => Err(TubeQaError::Config(format!(
            "Unknown embedding provider: {} (expected 'openai' or 'hashing')",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_embedder_by_provider() {
        let settings = EmbeddingSettings {
            provider: "hashing".to_string(),
            dimensions: 64,
            ..EmbeddingSettings::default()
        };
        assert_eq!(create_embedder(&settings).unwrap().dimensions(), 64);

        let settings = EmbeddingSettings {
            provider: "word2vec".to_string(),
            ..EmbeddingSettings::default()
        };
        assert!(matches!(create_embedder(&settings), Err(TubeQaError::Config(_))));
    }
}
