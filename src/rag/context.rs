//! Context block construction for grounded prompts.

use crate::chunking::SourceChunk;

/// Render chunks as `[Source: url]` blocks, in the given order.
///
/// The order is the model's only relevance signal, so callers pass chunks
/// best match first.
pub fn format_context_for_prompt(chunks: &[SourceChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| format!("[Source: {}]\n{}", chunk.source_url, chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
