//! In-memory vector store implementation.
//!
//! Useful for testing and local runs without a Qdrant instance.

use super::{cosine_similarity, EmbeddedDocument, SearchResult, VectorStore};
use crate::error::{Result, YtChatError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Collection {
    dimensions: usize,
    points: HashMap<Uuid, EmbeddedDocument>,
}

/// In-memory vector store.
#[derive(Default)]
pub struct MemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(collection: &str) -> YtChatError {
    YtChatError::Indexing(format!("Collection {} does not exist", collection))
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn recreate_collection(&self, collection: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.insert(
            collection.to_string(),
            Collection {
                dimensions,
                points: HashMap::new(),
            },
        );
        Ok(())
    }

    async fn collection_exists(&self, collection: &str) -> Result<bool> {
        Ok(self.collections.read().await.contains_key(collection))
    }

    async fn upsert(&self, collection: &str, points: &[EmbeddedDocument]) -> Result<usize> {
        let mut collections = self.collections.write().await;
        let target = collections.get_mut(collection).ok_or_else(|| missing(collection))?;

        if let Some(bad) = points.iter().find(|p| p.embedding.len() != target.dimensions) {
            return Err(YtChatError::Indexing(format!(
                "Vector dimension mismatch: expected {}, got {}",
                target.dimensions,
                bad.embedding.len()
            )));
        }

        for point in points {
            target.points.insert(point.id, point.clone());
        }
        Ok(points.len())
    }

    async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let target = collections.get(collection).ok_or_else(|| missing(collection))?;

        let mut results: Vec<SearchResult> = target
            .points
            .values()
            .map(|point| SearchResult {
                document: point.document.clone(),
                score: cosine_similarity(query_embedding, &point.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        Ok(results)
    }

    async fn point_count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map(|c| c.points.len())
            .ok_or_else(|| missing(collection))
    }
}
