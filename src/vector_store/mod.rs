//! Vector store abstraction for ytchat.
//!
//! Stores are organised in named collections, one per video. The
//! [`VideoIndex`] handle ties a collection to the embedder that fills it.

mod index;
mod memory;
mod qdrant;

pub use index::VideoIndex;
pub use memory::MemoryVectorStore;
pub use qdrant::QdrantVectorStore;

use crate::config::{VectorStoreProvider, VectorStoreSettings};
use crate::document::Document;
use crate::error::{Result, YtChatError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// A document with its embedding, as stored in a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedDocument {
    /// Point ID.
    pub id: Uuid,
    /// The indexed document (stored as payload).
    pub document: Document,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl EmbeddedDocument {
    pub fn new(document: Document, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            document,
            embedding,
        }
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Drop the collection if it exists and create it empty.
    async fn recreate_collection(&self, collection: &str, dimensions: usize) -> Result<()>;

    /// Check whether a collection exists.
    async fn collection_exists(&self, collection: &str) -> Result<bool>;

    /// Insert or replace points in a collection.
    async fn upsert(&self, collection: &str, points: &[EmbeddedDocument]) -> Result<usize>;

    /// Nearest neighbours of `query_embedding`, best first.
    async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Number of points in a collection.
    async fn point_count(&self, collection: &str) -> Result<usize>;
}

/// Create the configured vector store.
pub fn create_vector_store(
    settings: &VectorStoreSettings,
    timeout: Duration,
) -> Result<Arc<dyn VectorStore>> {
    match settings.provider {
        VectorStoreProvider::Memory => Ok(Arc::new(MemoryVectorStore::new())),
        VectorStoreProvider::Qdrant => {
            let url = settings.url.as_deref().ok_or_else(|| {
                YtChatError::Config("QDRANT_URL is required for the qdrant vector store".to_string())
            })?;
            Ok(Arc::new(QdrantVectorStore::new(
                url,
                settings.api_key.as_deref(),
                timeout,
            )?))
        }
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
