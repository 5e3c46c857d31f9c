//! Transcript command implementation.

use crate::chunking::{format_seconds, TranscriptChunker};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::TubeQaError;
use crate::transcript::{TranscriptFetcher, VideoId, YoutubeTranscriptProvider};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Print the transcript of a video, or the chunks it would be indexed as.
pub async fn run_transcript(url: &str, show_chunks: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Transcript, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let Some(video_id) = VideoId::parse(url) else {
        let e = TubeQaError::InvalidUrl(url.to_string());
        Output::error(&e.guidance());
        return Err(e.into());
    };

    let provider = YoutubeTranscriptProvider::with_config(
        Duration::from_secs(settings.transcript.request_timeout_secs),
        &settings.transcript.accept_language,
    )?;
    let fetcher = TranscriptFetcher::new(Arc::new(provider))
        .with_preferred_languages(settings.transcript.preferred_languages.clone());

    let spinner = Output::spinner("Fetching transcript...");
    let segments = match fetcher.fetch(&video_id).await {
        Ok(segments) => {
            spinner.finish_and_clear();
            segments
        }
        Err(e) => {
            spinner.finish_and_clear();
            let e = TubeQaError::from(e);
            Output::error(&e.guidance());
            return Err(e.into());
        }
    };

    if !show_chunks {
        Output::header(&format!("Transcript of {} ({} segments)", video_id, segments.len()));
        for segment in &segments {
            Output::segment(&format_seconds(segment.start_seconds), &segment.text);
        }
        return Ok(());
    }

    let chunker = TranscriptChunker::with_config(settings.chunking.chunk_size, settings.chunking.chunk_overlap);
    let chunks = chunker.chunk(&segments, &video_id);

    Output::header(&format!("Chunks of {} ({} chunks)", video_id, chunks.len()));
    for chunk in &chunks {
        Output::source(chunk.format_timestamp().as_deref(), &chunk.source_url, &chunk.text);
    }

    Ok(())
}
