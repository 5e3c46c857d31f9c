//! Configuration module for tubeqa.
//!
//! Handles loading settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, PromptSettings, RagSettings, ServerSettings, Settings,
    TranscriptSettings,
};
