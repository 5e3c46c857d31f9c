//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::SessionController;
use anyhow::Result;

/// Process a video and answer one question about it.
pub async fn run_ask(url: &str, question: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let controller = SessionController::new(&settings)?;

    let spinner = Output::spinner("Fetching and indexing transcript...");
    let outcome = match controller.process_video(url).await {
        Ok(outcome) => {
            spinner.finish_and_clear();
            outcome
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&e.guidance());
            return Err(e.into());
        }
    };
    Output::success(&format!(
        "Indexed {} ({} segments, {} chunks)",
        outcome.video_id, outcome.segment_count, outcome.chunk_count
    ));

    let spinner = Output::spinner("Generating answer...");
    match controller.ask(question).await {
        Ok(answer) => {
            spinner.finish_and_clear();

            println!("\n{}\n", answer.text);

            if !answer.cited_chunks.is_empty() {
                Output::header("Sources");
                for chunk in &answer.cited_chunks {
                    Output::source(chunk.format_timestamp().as_deref(), &chunk.source_url, &chunk.text);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
