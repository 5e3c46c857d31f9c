//! Session orchestration for tubeqa.
//!
//! The [`SessionController`] coordinates the build phase (fetch, chunk,
//! index) and the query phase (retrieve, synthesize) around a single active
//! video index.

use crate::chunking::TranscriptChunker;
use crate::config::{Prompts, Settings};
use crate::embedding::{create_embedder, Embedder};
use crate::error::{Result, TubeQaError};
use crate::rag::{Answer, AnswerSynthesizer, LanguageModel, OpenAIChatModel};
use crate::transcript::{TranscriptError, TranscriptFetcher, VideoId, YoutubeTranscriptProvider};
use crate::vector_store::{SearchResult, VectorIndex, DEFAULT_TOP_K};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// The published index for the current video.
pub struct ActiveVideo {
    pub video_id: VideoId,
    pub index: VectorIndex,
    pub processed_at: DateTime<Utc>,
}

/// Snapshot of the controller state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Ready {
        video_id: VideoId,
        chunk_count: usize,
        index_id: Uuid,
        processed_at: DateTime<Utc>,
    },
}

/// Result of processing a video.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    pub video_id: VideoId,
    pub segment_count: usize,
    pub chunk_count: usize,
    pub index_id: Uuid,
}

/// Owns the single active video index and runs both pipeline phases.
///
/// `process_video` builds a complete index before publishing it with one
/// write-locked swap, so readers see either the previous index or the new
/// one. `ask` clones the published `Arc` and releases the lock before any
/// network call, so concurrent questions never block each other.
pub struct SessionController {
    fetcher: TranscriptFetcher,
    chunker: TranscriptChunker,
    embedder: Arc<dyn Embedder>,
    synthesizer: AnswerSynthesizer,
    top_k: usize,
    active: RwLock<Option<Arc<ActiveVideo>>>,
}

impl SessionController {
    /// Create a controller wired to the configured providers.
    pub fn new(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let provider = YoutubeTranscriptProvider::with_config(
            Duration::from_secs(settings.transcript.request_timeout_secs),
            &settings.transcript.accept_language,
        )
        .map_err(|e| TubeQaError::Config(format!("Failed to create transcript client: {}", e)))?;

        let fetcher = TranscriptFetcher::new(Arc::new(provider))
            .with_preferred_languages(settings.transcript.preferred_languages.clone());

        let embedder = create_embedder(&settings.embedding)?;
        let model: Arc<dyn LanguageModel> = Arc::new(OpenAIChatModel::from_settings(&settings.rag)?);

        info!(
            "Using {} embeddings and {} for answers",
            settings.embedding.provider, settings.rag.model
        );

        Ok(Self::with_components(
            fetcher,
            TranscriptChunker::with_config(settings.chunking.chunk_size, settings.chunking.chunk_overlap),
            embedder,
            AnswerSynthesizer::new(model).with_prompts(prompts),
        )
        .with_top_k(settings.rag.top_k))
    }

    /// Create a controller with custom components.
    pub fn with_components(
        fetcher: TranscriptFetcher,
        chunker: TranscriptChunker,
        embedder: Arc<dyn Embedder>,
        synthesizer: AnswerSynthesizer,
    ) -> Self {
        Self {
            fetcher,
            chunker,
            embedder,
            synthesizer,
            top_k: DEFAULT_TOP_K,
            active: RwLock::new(None),
        }
    }

    /// Set the number of chunks retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        match self.current() {
            None => SessionState::Idle,
            Some(active) => SessionState::Ready {
                video_id: active.video_id.clone(),
                chunk_count: active.index.len(),
                index_id: active.index.id(),
                processed_at: active.processed_at,
            },
        }
    }

    /// Fetch, chunk and index a video, then make it the active one.
    ///
    /// On failure the previously active video, if any, stays in place.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn process_video(&self, url: &str) -> Result<ProcessOutcome> {
        let video_id = VideoId::parse(url).ok_or_else(|| TubeQaError::InvalidUrl(url.to_string()))?;
        info!("Processing video {}", video_id);

        let segments = self.fetcher.fetch(&video_id).await?;

        let chunks = self.chunker.chunk(&segments, &video_id);
        if chunks.is_empty() {
            return Err(TranscriptError::NotFound {
                video_id: video_id.to_string(),
            }
            .into());
        }

        let index = VectorIndex::build(self.embedder.as_ref(), chunks).await?;
        let outcome = ProcessOutcome {
            video_id: video_id.clone(),
            segment_count: segments.len(),
            chunk_count: index.len(),
            index_id: index.id(),
        };

        self.publish(ActiveVideo {
            video_id,
            index,
            processed_at: Utc::now(),
        });

        info!(
            "Video {} ready: {} segments, {} chunks",
            outcome.video_id, outcome.segment_count, outcome.chunk_count
        );
        Ok(outcome)
    }

    /// Retrieve the best matching chunks for `query` without generating an answer.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let active = self.current().ok_or(TubeQaError::NoActiveVideo)?;
        let query = validate_query(query)?;
        active.index.search(self.embedder.as_ref(), query, self.top_k).await
    }

    /// Answer a question about the active video.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn ask(&self, query: &str) -> Result<Answer> {
        let active = self.current().ok_or(TubeQaError::NoActiveVideo)?;
        let query = validate_query(query)?;

        let results = active.index.search(self.embedder.as_ref(), query, self.top_k).await?;
        let chunks = results.into_iter().map(|r| r.chunk).collect();

        self.synthesizer.synthesize(query, chunks).await
    }

    fn current(&self) -> Option<Arc<ActiveVideo>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn publish(&self, video: ActiveVideo) {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        *active = Some(Arc::new(video));
    }
}

fn validate_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(TubeQaError::InvalidInput("Query must not be empty".to_string()));
    }
    Ok(query)
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::rag::testing::RecordingModel;
    use crate::transcript::testing::ScriptedProvider;
    use crate::transcript::TimedSegment;
    use tokio_test::{assert_err, assert_ok};

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    fn hello_world() -> Vec<TimedSegment> {
        vec![
            TimedSegment::new(0, "hello"),
            TimedSegment::new(5, "world"),
            TimedSegment::new(900, "end"),
        ]
    }

    #[tokio::test]
    async fn test_ask_before_process_is_no_active_video() {
        let session = controller(single_video(hello_world()), Arc::new(RecordingModel::replying("x")));

        assert_eq!(session.state(), SessionState::Idle);
        let err = assert_err!(session.ask("hello?").await);
        assert!(matches!(err, TubeQaError::NoActiveVideo));
        assert!(matches!(session.search("hello?").await, Err(TubeQaError::NoActiveVideo)));
        // Blank queries also report the missing video first.
        assert!(matches!(session.ask("   ").await, Err(TubeQaError::NoActiveVideo)));
        assert!(matches!(session.search("").await, Err(TubeQaError::NoActiveVideo)));
    }

    #[tokio::test]
    async fn test_process_then_ask_end_to_end() {
        let model = Arc::new(RecordingModel::replying("They say hello at https://youtu.be/dQw4w9WgXcQ?t=0s"));
        let session = controller(single_video(hello_world()), model.clone());

        let outcome = assert_ok!(session.process_video(URL).await);
        assert_eq!(outcome.video_id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(outcome.segment_count, 3);
        assert_eq!(outcome.chunk_count, 1);

        let answer = assert_ok!(session.ask("hello world").await);
        assert_eq!(answer.text, "They say hello at https://youtu.be/dQw4w9WgXcQ?t=0s");
        assert_eq!(answer.cited_chunks.len(), 1);
        assert_eq!(answer.cited_chunks[0].source_url, "https://youtu.be/dQw4w9WgXcQ?t=0s");
        assert_eq!(
            answer.cited_chunks[0].text,
            "[START:0] hello [START:5] world [START:900] end"
        );

        let prompt = model.last_user_prompt().unwrap();
        assert!(prompt.contains("[Source: https://youtu.be/dQw4w9WgXcQ?t=0s]"));
        assert!(prompt.ends_with("Question: hello world"));
    }

    #[tokio::test]
    async fn test_cited_chunks_equal_retrieved_chunks() {
        let segments: Vec<TimedSegment> = (0..60)
            .map(|i| TimedSegment::new(i * 10, format!("segment {} covers subject {} thoroughly and at length", i, i % 6)))
            .collect();
        let session = controller(single_video(segments), Arc::new(RecordingModel::replying("ok")))
            .with_top_k(3);
        assert_ok!(session.process_video(URL).await);

        let retrieved: Vec<_> = session
            .search("subject 4")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.chunk)
            .collect();
        let answer = session.ask("subject 4").await.unwrap();

        assert_eq!(retrieved.len(), 3);
        assert_eq!(answer.cited_chunks, retrieved);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let session = controller(single_video(hello_world()), Arc::new(RecordingModel::replying("x")));
        let err = session.process_video("https://example.com/nothing").await.unwrap_err();
        assert!(matches!(err, TubeQaError::InvalidUrl(_)));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_transcript_failures_are_typed() {
        let disabled = Arc::new(ScriptedProvider::failing(TranscriptError::Disabled {
            video_id: "dQw4w9WgXcQ".to_string(),
        }));
        let session = controller(disabled, Arc::new(RecordingModel::replying("x")));
        let err = session.process_video(URL).await.unwrap_err();
        assert!(matches!(
            err,
            TubeQaError::TranscriptUnavailable(TranscriptError::Disabled { .. })
        ));

        let empty = single_video(Vec::new());
        let session = controller(empty, Arc::new(RecordingModel::replying("x")));
        let err = session.process_video(URL).await.unwrap_err();
        assert!(matches!(
            err,
            TubeQaError::TranscriptUnavailable(TranscriptError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_reprocessing_discards_previous_video() {
        let provider = LibraryProvider::default()
            .with_video("aaaaaaaaaaa", vec![TimedSegment::new(3, "volcanoes erupt lava and ash")])
            .with_video("bbbbbbbbbbb", vec![TimedSegment::new(7, "penguins swim in cold water")]);
        let model = Arc::new(RecordingModel::replying("answer"));
        let session = controller(Arc::new(provider), model.clone());

        assert_ok!(session.process_video("https://youtu.be/aaaaaaaaaaa").await);
        let first_index = match session.state() {
            SessionState::Ready { index_id, .. } => index_id,
            SessionState::Idle => panic!("expected ready"),
        };

        assert_ok!(session.process_video("https://youtu.be/bbbbbbbbbbb").await);
        match session.state() {
            SessionState::Ready { video_id, index_id, .. } => {
                assert_eq!(video_id.as_str(), "bbbbbbbbbbb");
                assert_ne!(index_id, first_index);
            }
            SessionState::Idle => panic!("expected ready"),
        }

        let answer = session.ask("volcanoes lava").await.unwrap();
        assert!(!answer.cited_chunks.is_empty());
        for chunk in &answer.cited_chunks {
            assert!(chunk.source_url.contains("bbbbbbbbbbb"));
            assert!(!chunk.text.contains("volcanoes"));
        }
        assert!(!model.last_user_prompt().unwrap().contains("aaaaaaaaaaa"));
    }

    #[tokio::test]
    async fn test_failed_reprocess_keeps_previous_video() {
        let provider = LibraryProvider::default().with_video("aaaaaaaaaaa", hello_world());
        let session = controller(Arc::new(provider), Arc::new(RecordingModel::replying("x")));

        assert_ok!(session.process_video("https://youtu.be/aaaaaaaaaaa").await);
        assert_err!(session.process_video("https://youtu.be/ccccccccccc").await);

        match session.state() {
            SessionState::Ready { video_id, .. } => assert_eq!(video_id.as_str(), "aaaaaaaaaaa"),
            SessionState::Idle => panic!("expected ready"),
        }
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let session = controller(single_video(hello_world()), Arc::new(RecordingModel::replying("x")));
        assert_ok!(session.process_video(URL).await);
        assert!(matches!(session.ask("   ").await, Err(TubeQaError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_llm_failure_is_provider_failure() {
        let session = controller(single_video(hello_world()), Arc::new(RecordingModel::failing()));
        assert_ok!(session.process_video(URL).await);

        let err = session.ask("hello").await.unwrap_err();
        assert!(err.is_provider_failure());
        // The index stays usable after a failed answer.
        assert!(matches!(session.state(), SessionState::Ready { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_asks_share_index() {
        let session = Arc::new(controller(
            single_video(hello_world()),
            Arc::new(RecordingModel::replying("ok")),
        ));
        assert_ok!(session.process_video(URL).await);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let session = session.clone();
                tokio::spawn(async move { session.ask(&format!("question {}", i)).await })
            })
            .collect();

        for handle in handles {
            let answer = handle.await.unwrap().unwrap();
            assert_eq!(answer.cited_chunks.len(), 1);
        }
    }
}
