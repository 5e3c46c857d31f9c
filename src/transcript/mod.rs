//! Transcript acquisition.
//!
//! A [`TranscriptProvider`] lists and downloads caption tracks; the
//! [`TranscriptFetcher`] applies the language selection policy on top of it
//! and turns provider failures into a typed [`TranscriptError`].

mod video_id;
mod youtube;

pub use video_id::VideoId;
pub use youtube::YoutubeTranscriptProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Language codes tried first when choosing a caption track.
pub const DEFAULT_PREFERRED_LANGUAGES: &[&str] = &["en", "hi", "es", "fr", "de"];

/// One caption unit with its start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedSegment {
    /// Start time in whole seconds, truncated.
    pub start_seconds: u64,
    /// Raw caption text.
    pub text: String,
}

impl TimedSegment {
    pub fn new(start_seconds: u64, text: impl Into<String>) -> Self {
        Self {
            start_seconds,
            text: text.into(),
        }
    }

    /// Build a segment from a fractional provider timestamp.
    pub fn from_fractional(start: f64, text: impl Into<String>) -> Self {
        // `as` truncates toward zero and saturates NaN/negatives to 0.
        Self::new(start.max(0.0) as u64, text)
    }
}

/// A caption track as listed by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTrack {
    /// Language code, e.g. `en` or `pt-BR`.
    pub language_code: String,
    /// Human-readable language name.
    pub language: String,
    /// Whether the track was produced by speech recognition.
    pub is_generated: bool,
    /// Provider-specific location of the track's content.
    pub fetch_url: String,
}

/// Why a transcript could not be obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("transcripts are disabled for video {video_id}")]
    Disabled { video_id: String },

    #[error("no transcript found for video {video_id}")]
    NotFound { video_id: String },

    #[error("failed to fetch transcript: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TranscriptError {
    fn from(e: reqwest::Error) -> Self {
        TranscriptError::Other(e.to_string())
    }
}

/// Capability for listing and downloading caption tracks.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// List the caption tracks available for a video, in provider order.
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<TranscriptTrack>, TranscriptError>;

    /// Download the segments of one track.
    async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<TimedSegment>, TranscriptError>;
}

/// Choose a track: the first listed track whose language is in `preferred`,
/// else the first listed track.
///
/// Only membership in `preferred` matters, not its order, so the result
/// depends on the order in which the provider lists tracks.
pub fn select_track<'a>(tracks: &'a [TranscriptTrack], preferred: &[String]) -> Option<&'a TranscriptTrack> {
    tracks
        .iter()
        .find(|t| preferred.iter().any(|code| code == &t.language_code))
        .or_else(|| tracks.first())
}

/// Fetches the transcript of a video using a language preference policy.
pub struct TranscriptFetcher {
    provider: Arc<dyn TranscriptProvider>,
    preferred_languages: Vec<String>,
}

impl TranscriptFetcher {
    /// Create a fetcher with the default preferred languages.
    pub fn new(provider: Arc<dyn TranscriptProvider>) -> Self {
        Self {
            provider,
            preferred_languages: DEFAULT_PREFERRED_LANGUAGES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Set the preferred language codes.
    pub fn with_preferred_languages(mut self, languages: Vec<String>) -> Self {
        self.preferred_languages = languages;
        self
    }

    /// Fetch the ordered segments of the selected track.
    #[instrument(skip(self), fields(video_id = %video_id))]
    pub async fn fetch(&self, video_id: &VideoId) -> Result<Vec<TimedSegment>, TranscriptError> {
        let result = self.fetch_inner(video_id).await;

        match &result {
            Ok(segments) => info!("Fetched {} transcript segments", segments.len()),
            Err(TranscriptError::Disabled { .. }) => warn!("Transcripts are disabled"),
            Err(TranscriptError::NotFound { .. }) => warn!("No transcript available"),
            Err(TranscriptError::Other(detail)) => warn!("Transcript fetch failed: {}", detail),
        }

        result
    }

    async fn fetch_inner(&self, video_id: &VideoId) -> Result<Vec<TimedSegment>, TranscriptError> {
        let tracks = self.provider.list_tracks(video_id).await?;

        let track = select_track(&tracks, &self.preferred_languages).ok_or_else(|| {
            TranscriptError::NotFound {
                video_id: video_id.to_string(),
            }
        })?;

        info!(
            "Using transcript in language: {} ({}){}",
            track.language,
            track.language_code,
            if track.is_generated { " [auto-generated]" } else { "" }
        );

        let mut segments = self.provider.fetch_track(track).await?;
        if segments.is_empty() {
            return Err(TranscriptError::NotFound {
                video_id: video_id.to_string(),
            });
        }

        segments.sort_by_key(|s| s.start_seconds);
        Ok(segments)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted provider returning fixed tracks and segments.
    pub struct ScriptedProvider {
        pub tracks: std::result::Result<Vec<TranscriptTrack>, TranscriptError>,
        pub segments: Vec<TimedSegment>,
        pub fetched: std::sync::Mutex<Vec<String>>,
        pub list_calls: AtomicUsize,
    }

    impl ScriptedProvider {
        pub fn with_segments(segments: Vec<TimedSegment>) -> Self {
            Self {
                tracks: Ok(vec![track("en", false)]),
                segments,
                fetched: std::sync::Mutex::new(Vec::new()),
                list_calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(error: TranscriptError) -> Self {
            Self {
                tracks: Err(error),
                segments: Vec::new(),
                fetched: std::sync::Mutex::new(Vec::new()),
                list_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TranscriptProvider for ScriptedProvider {
        async fn list_tracks(&self, _video_id: &VideoId) -> Result<Vec<TranscriptTrack>, TranscriptError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.tracks.clone()
        }

        async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<TimedSegment>, TranscriptError> {
            self.fetched.lock().unwrap().push(track.language_code.clone());
            Ok(self.segments.clone())
        }
    }

    pub fn track(code: &str, is_generated: bool) -> TranscriptTrack {
        TranscriptTrack {
            language_code: code.to_string(),
            language: code.to_uppercase(),
            is_generated,
            fetch_url: format!("https://example.test/{}", code),
        }
    }
}
