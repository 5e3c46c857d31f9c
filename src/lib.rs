//! tubeqa - Question answering over YouTube videos
//!
//! Fetches the transcript of a YouTube video, splits it into overlapping
//! chunks tagged with timestamped links, indexes them for similarity search,
//! and answers questions with an LLM grounded in the retrieved chunks.
//!
//! # Architecture
//!
//! - `transcript` - Video id parsing and caption track retrieval
//! - `chunking` - Timestamp-preserving transcript chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - In-memory similarity index over one video
//! - `rag` - Grounded answer generation with source attribution
//! - `orchestrator` - Session state machine holding the active video
//! - `config` - Settings and prompt templates
//! - `cli` - Command line interface and HTTP API
//!
//! # Example
//!
//! ```rust,no_run
//! use tubeqa::config::Settings;
//! use tubeqa::orchestrator::SessionController;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let session = SessionController::new(&settings)?;
//!
//!     session.process_video("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//!     let answer = session.ask("What is this video about?").await?;
//!     println!("{}", answer.format_for_display());
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod transcript;
pub mod vector_store;

pub use error::{Result, TubeQaError};
