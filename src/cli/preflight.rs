//! Pre-flight checks before expensive operations.
//!
//! Validates that required API keys are configured before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, TubeQaError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Serving needs the LLM key and, for remote embeddings, the embedding key.
    Serve,
    /// Same requirements as serving.
    Ask,
    /// Fetching a transcript needs no credentials.
    Transcript,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_with(operation, settings, |name| std::env::var(name).ok())
}

fn check_with<F>(operation: Operation, settings: &Settings, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    match operation {
        Operation::Serve | Operation::Ask => {
            check_api_key(&settings.rag.api_key_env, &lookup)?;
            if settings.embedding.provider == "openai" {
                check_api_key(&settings.embedding.api_key_env, &lookup)?;
            }
        }
        Operation::Transcript => {}
    }
    Ok(())
}

fn check_api_key<F>(name: &str, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(key) if !key.trim().is_empty() => Ok(()),
        Some(_) => Err(TubeQaError::Config(format!(
            "{} is empty. Set it in your environment or a .env file.",
            name
        ))),
        None => Err(TubeQaError::Config(format!(
            "{} not set. Set it with: export {}='...' or add it to a .env file.",
            name, name
        ))),
    }
}
