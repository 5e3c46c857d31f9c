//! Transcript chunking with timestamp provenance.
//!
//! Segments are concatenated into one document with an inline `[START:n]`
//! marker in front of each caption, so the start time survives free-text
//! splitting. Each chunk is then attributed to the first marker it contains.

mod splitter;

pub use splitter::{RecursiveSplitter, DEFAULT_SEPARATORS};

use crate::transcript::{TimedSegment, VideoId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, instrument};

static MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[START:(\d+)\]").expect("marker regex is valid"));

/// A chunk of transcript text with the link it should be cited by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceChunk {
    /// Chunk text, including its inline timestamp markers.
    pub text: String,
    /// Short-link URL, timestamped when the chunk contains a marker.
    pub source_url: String,
    /// Start time taken from the first marker in the chunk.
    pub start_seconds: Option<u64>,
}

impl SourceChunk {
    /// Build a chunk and derive its source URL from the first marker.
    pub fn new(text: String, video_id: &VideoId) -> Self {
        let start_seconds = first_marker(&text);
        let source_url = match start_seconds {
            Some(seconds) => video_id.timestamp_url(seconds),
            None => video_id.short_url(),
        };

        Self {
            text,
            source_url,
            start_seconds,
        }
    }

    /// Format the start time as MM:SS or HH:MM:SS.
    pub fn format_timestamp(&self) -> Option<String> {
        self.start_seconds.map(format_seconds)
    }
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_seconds(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Render segments as one document with inline start-time markers.
pub fn compose_document(segments: &[TimedSegment]) -> String {
    segments
        .iter()
        .map(|s| format!("[START:{}] {}", s.start_seconds, s.text))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Start time encoded by the first marker in `text`.
pub fn first_marker(text: &str) -> Option<u64> {
    MARKER_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Splits transcripts into overlapping, timestamp-attributed chunks.
#[derive(Debug, Clone, Default)]
pub struct TranscriptChunker {
    splitter: RecursiveSplitter,
}

impl TranscriptChunker {
    /// Create a chunker with ~1000 character chunks and 100 characters of overlap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chunker with custom sizes, in characters.
    pub fn with_config(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            splitter: RecursiveSplitter::new(chunk_size, chunk_overlap),
        }
    }

    /// Chunk a transcript. An empty transcript yields no chunks.
    #[instrument(skip(self, segments), fields(video_id = %video_id, segments = segments.len()))]
    pub fn chunk(&self, segments: &[TimedSegment], video_id: &VideoId) -> Vec<SourceChunk> {
        if segments.is_empty() {
            return Vec::new();
        }

        let document = compose_document(segments);
        let chunks: Vec<SourceChunk> = self
            .splitter
            .split(&document)
            .into_iter()
            .map(|text| SourceChunk::new(text, video_id))
            .collect();

        debug!(
            "Split {} characters into {} chunks",
            document.chars().count(),
            chunks.len()
        );
        chunks
    }
}
