//! RAG (Retrieval-Augmented Generation) over a single video's transcript.
//!
//! The summarizer runs once at ingestion; the query handler answers each
//! question from the summary plus the closest transcript chunks.

mod query;
mod summary;

pub use query::{QueryHandler, TOP_K};
pub use summary::{sample_documents, Summarizer};
