//! Per-video collection handle.

use super::{EmbeddedDocument, SearchResult, VectorStore};
use crate::document::Document;
use crate::embedding::Embedder;
use crate::error::{Result, YtChatError};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A collection in a vector store together with the embedder that filled it.
#[derive(Clone)]
pub struct VideoIndex {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    collection: String,
}

impl std::fmt::Debug for VideoIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoIndex")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl VideoIndex {
    /// Collection name for a video.
    pub fn collection_name(video_id: &str) -> String {
        format!("yt-{}", video_id)
    }

    /// Replace the video's collection with freshly embedded documents.
    ///
    /// Documents are embedded `batch_size` at a time. Embeddings whose length
    /// differs from the embedder's dimensions are dropped with a warning.
    #[instrument(skip(store, embedder, documents), fields(count = documents.len()))]
    pub async fn from_documents(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        video_id: &str,
        documents: &[Document],
        batch_size: usize,
    ) -> Result<Self> {
        let collection = Self::collection_name(video_id);
        let dimensions = embedder.dimensions();

        store.recreate_collection(&collection, dimensions).await?;

        let mut indexed = 0;
        for batch in documents.chunks(batch_size.max(1)) {
            let texts: Vec<String> = batch.iter().map(|d| d.content.clone()).collect();
            let embeddings = embedder.embed_batch(&texts).await?;

            if embeddings.len() != batch.len() {
                warn!(
                    "Embedder returned {} vectors for {} documents",
                    embeddings.len(),
                    batch.len()
                );
            }

            let points: Vec<EmbeddedDocument> = batch
                .iter()
                .zip(embeddings)
                .filter(|(_, embedding)| embedding.len() == dimensions)
                .map(|(doc, embedding)| EmbeddedDocument::new(doc.clone(), embedding))
                .collect();

            if points.len() != batch.len() {
                warn!(
                    "Skipped {} documents with invalid embeddings",
                    batch.len() - points.len()
                );
            }

            indexed += store.upsert(&collection, &points).await?;
        }

        info!("Indexed {} of {} documents into {}", indexed, documents.len(), collection);

        Ok(Self {
            store,
            embedder,
            collection,
        })
    }

    /// Open a collection that was indexed earlier.
    pub async fn from_existing_collection(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        collection: &str,
    ) -> Result<Self> {
        if !store.collection_exists(collection).await? {
            return Err(YtChatError::Indexing(format!(
                "Collection {} does not exist",
                collection
            )));
        }

        Ok(Self {
            store,
            embedder,
            collection: collection.to_string(),
        })
    }

    /// Embed `query` and return the `k` most similar documents.
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;
        self.store.search(&self.collection, &query_embedding, k).await
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn store(&self) -> Arc<dyn VectorStore> {
        self.store.clone()
    }

    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_documents;
    use crate::testing::{numbered_segments, HashEmbedder};
    use crate::transcript::TranscriptSegment;
    use crate::vector_store::MemoryVectorStore;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_from_documents_in_batches() {
        let store: Arc<dyn VectorStore> = Arc::new(MemoryVectorStore::new());
        let embedder = Arc::new(HashEmbedder::new(8));
        let documents = build_documents("abc12345678", &numbered_segments(25));

        let index = VideoIndex::from_documents(store.clone(), embedder.clone(), "abc12345678", &documents, 10)
            .await
            .unwrap();

        assert_eq!(index.collection(), "yt-abc12345678");
        assert_eq!(store.point_count("yt-abc12345678").await.unwrap(), 25);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_invalid_embeddings_are_skipped() {
        let store: Arc<dyn VectorStore> = Arc::new(MemoryVectorStore::new());
        let documents = build_documents(
            "vid",
            &[
                TranscriptSegment::new(0.0, "fine"),
                TranscriptSegment::new(1.0, "BADVEC"),
                TranscriptSegment::new(2.0, "also fine"),
            ],
        );

        VideoIndex::from_documents(store.clone(), Arc::new(HashEmbedder::new(8)), "vid", &documents, 100)
            .await
            .unwrap();

        assert_eq!(store.point_count("yt-vid").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reindex_replaces_collection() {
        let store: Arc<dyn VectorStore> = Arc::new(MemoryVectorStore::new());
        let embedder = Arc::new(HashEmbedder::new(8));

        let first = build_documents("vid", &numbered_segments(12));
        VideoIndex::from_documents(store.clone(), embedder.clone(), "vid", &first, 100)
            .await
            .unwrap();
        let second = build_documents("vid", &numbered_segments(4));
        VideoIndex::from_documents(store.clone(), embedder, "vid", &second, 100)
            .await
            .unwrap();

        assert_eq!(store.point_count("yt-vid").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_open_existing_and_search() {
        let store: Arc<dyn VectorStore> = Arc::new(MemoryVectorStore::new());
        let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(32));
        let documents = build_documents(
            "vid",
            &[
                TranscriptSegment::new(0.0, "rust ownership rules"),
                TranscriptSegment::new(5.0, "cooking pasta tonight"),
            ],
        );
        VideoIndex::from_documents(store.clone(), embedder.clone(), "vid", &documents, 100)
            .await
            .unwrap();

        let index = VideoIndex::from_existing_collection(store, embedder, "yt-vid")
            .await
            .unwrap();
        let results = index.similarity_search("cooking pasta tonight", 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.content, "cooking pasta tonight");
    }

    #[tokio::test]
    async fn test_open_missing_collection() {
        let result = VideoIndex::from_existing_collection(
            Arc::new(MemoryVectorStore::new()),
            Arc::new(HashEmbedder::new(8)),
            "yt-missing",
        )
        .await;

        assert!(matches!(result, Err(YtChatError::Indexing(_))));
    }
}
