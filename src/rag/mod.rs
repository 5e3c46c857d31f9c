//! Answer synthesis with source attribution.
//!
//! Retrieved chunks are framed into a grounded prompt and handed to a
//! [`LanguageModel`]; the answer is returned together with exactly the chunks
//! that were shown to the model.

pub mod context;
mod llm;
mod synthesizer;

pub use llm::{ChatMessage, ChatRole, LanguageModel, OpenAIChatModel};
pub use synthesizer::AnswerSynthesizer;

#[cfg(test)]
pub(crate) use synthesizer::testing;

use crate::chunking::SourceChunk;
use serde::Serialize;

/// A generated answer and the chunks it was grounded on.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Model output, verbatim.
    pub text: String,
    /// The chunks passed to the model, in retrieval order.
    pub cited_chunks: Vec<SourceChunk>,
}

impl Answer {
    /// Format the answer for terminal display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.text.clone();

        if !self.cited_chunks.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for chunk in &self.cited_chunks {
                match chunk.format_timestamp() {
                    Some(ts) => output.push_str(&format!("\n@ {}  {}", ts, chunk.source_url)),
                    None => output.push_str(&format!("\n{}", chunk.source_url)),
                }
            }
        }

        output
    }
}
