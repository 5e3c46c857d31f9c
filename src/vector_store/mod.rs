//! Vector indexing and similarity retrieval.
//!
//! A [`VectorIndex`] is built once from the chunks of a single video and is
//! read-only afterwards; rebuilding means creating a new index.

mod flat;

pub use flat::FlatIndex;

use crate::chunking::SourceChunk;
use crate::embedding::Embedder;
use crate::error::{Result, TubeQaError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Number of chunks retrieved per question.
pub const DEFAULT_TOP_K: usize = 3;

/// A search result with score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// The matched chunk.
    pub chunk: SourceChunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Capability for k-nearest-neighbour search over a fixed set of vectors.
pub trait SimilaritySearch: Send + Sync {
    /// Number of indexed vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positions and scores of the `k` most similar vectors, best first.
    /// Ties keep insertion order.
    fn nearest(&self, query: &[f32], k: usize) -> Vec<(usize, f32)>;
}

/// Immutable index over the chunks of one video.
pub struct VectorIndex {
    id: Uuid,
    chunks: Vec<SourceChunk>,
    search: Box<dyn SimilaritySearch>,
    built_at: DateTime<Utc>,
}

impl VectorIndex {
    /// Embed `chunks` and build an exact cosine index over them.
    ///
    /// Fails on an empty chunk list.
    #[instrument(skip(embedder, chunks), fields(chunks = chunks.len()))]
    pub async fn build(embedder: &dyn Embedder, chunks: Vec<SourceChunk>) -> Result<Self> {
        if chunks.is_empty() {
            return Err(TubeQaError::VectorStore(
                "Cannot build an index over zero chunks".to_string(),
            ));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(TubeQaError::VectorStore(format!(
                "Embedding provider returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let index = Self::from_parts(chunks, Box::new(FlatIndex::new(embeddings)));
        info!("Built vector index {} over {} chunks", index.id, index.len());
        Ok(index)
    }

    /// Assemble an index from chunks and a search structure over their
    /// embeddings, in the same order.
    pub fn from_parts(chunks: Vec<SourceChunk>, search: Box<dyn SimilaritySearch>) -> Self {
        Self {
            id: Uuid::new_v4(),
            chunks,
            search,
            built_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// All indexed chunks in original order.
    pub fn chunks(&self) -> &[SourceChunk] {
        &self.chunks
    }

    /// Embed `query` and return up to `k` best matching chunks.
    #[instrument(skip(self, embedder), fields(index_id = %self.id))]
    pub async fn search(&self, embedder: &dyn Embedder, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = embedder.embed(query).await?;
        Ok(self.search_embedding(&query_embedding, k))
    }

    /// Return up to `k` chunks most similar to an already embedded query.
    pub fn search_embedding(&self, query_embedding: &[f32], k: usize) -> Vec<SearchResult> {
        let results: Vec<SearchResult> = self
            .search
            .nearest(query_embedding, k)
            .into_iter()
            .filter_map(|(position, score)| {
                self.chunks.get(position).map(|chunk| SearchResult {
                    chunk: chunk.clone(),
                    score,
                })
            })
            .collect();

        debug!("Retrieved {} of {} chunks", results.len(), self.chunks.len());
        results
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
