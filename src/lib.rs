//! ytchat - Chat with YouTube videos
//!
//! A small retrieval-augmented backend: give it a YouTube URL and it fetches
//! the caption track, indexes it in a vector store, summarizes it, and answers
//! questions grounded in the transcript.
//!
//! # Architecture
//!
//! - `transcript` - Video ID extraction and caption fetching
//! - `document` - Timestamped transcript documents
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector store abstraction and per-video index
//! - `llm` - Chat completion
//! - `rag` - Summarization and question answering
//! - `session` - In-memory cache of ingested videos
//! - `orchestrator` - Pipeline coordination
//! - `cli` - Command line and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use ytchat::config::Settings;
//! use ytchat::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let session = orchestrator
//!         .load_video("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
//!         .await?;
//!     println!("{}", session.summary);
//!
//!     let answer = orchestrator.ask(&session.video_id, "What is this about?").await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod session;
pub mod transcript;
pub mod vector_store;

#[cfg(test)]
mod testing;

pub use error::{Result, YtChatError};
