//! Grounded answer generation.

use super::context::format_context_for_prompt;
use super::{Answer, ChatMessage, LanguageModel};
use crate::chunking::SourceChunk;
use crate::config::Prompts;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Builds grounded prompts and delegates generation to a language model.
///
/// Holds no state between calls.
pub struct AnswerSynthesizer {
    model: Arc<dyn LanguageModel>,
    prompts: Prompts,
}

impl AnswerSynthesizer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Messages sent to the model for `query` over `chunks`.
    pub fn build_messages(&self, query: &str, chunks: &[SourceChunk]) -> Vec<ChatMessage> {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), query.to_string());
        vars.insert("context".to_string(), format_context_for_prompt(chunks));

        vec![
            ChatMessage::system(self.prompts.render_with_custom(&self.prompts.rag.system, &vars)),
            ChatMessage::user(self.prompts.render_with_custom(&self.prompts.rag.user, &vars)),
        ]
    }

    /// Answer `query` from `chunks`, which must be in retrieval-rank order.
    ///
    /// The model output is returned verbatim; the cited chunks are exactly
    /// the ones passed in.
    #[instrument(skip(self, chunks), fields(query = %query, chunks = chunks.len()))]
    pub async fn synthesize(&self, query: &str, chunks: Vec<SourceChunk>) -> Result<Answer> {
        let messages = self.build_messages(query, &chunks);
        let text = self.model.generate(&messages).await?;

        info!("Generated answer citing {} chunks", chunks.len());
        Ok(Answer {
            text,
            cited_chunks: chunks,
        })
    }
}
