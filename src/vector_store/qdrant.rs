//! Qdrant vector store over the REST API.

use super::{EmbeddedDocument, SearchResult, VectorStore};
use crate::document::Document;
use crate::error::{Result, YtChatError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Qdrant-backed vector store.
pub struct QdrantVectorStore {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct Point<'a> {
    id: Uuid,
    vector: &'a [f32],
    payload: &'a Document,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<SearchEntry>,
}

#[derive(Deserialize)]
struct SearchEntry {
    score: f32,
    payload: Option<Document>,
}

#[derive(Deserialize)]
struct CollectionResponse {
    result: CollectionInfo,
}

#[derive(Deserialize)]
struct CollectionInfo {
    #[serde(default)]
    points_count: Option<usize>,
}

impl QdrantVectorStore {
    /// Create a client for the Qdrant instance at `url`.
    pub fn new(url: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| YtChatError::Config(format!("Invalid Qdrant API key: {}", e)))?;
            headers.insert(HeaderName::from_static("api-key"), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| YtChatError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{}", self.base_url, collection)
    }

    async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(YtChatError::Indexing(format!(
            "qdrant {} failed ({}): {}",
            action, status, body
        )))
    }
}

fn request_error(action: &str, e: reqwest::Error) -> YtChatError {
    YtChatError::Indexing(format!("qdrant {} failed: {}", action, e))
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    #[instrument(skip(self))]
    async fn recreate_collection(&self, collection: &str, dimensions: usize) -> Result<()> {
        let url = self.collection_url(collection);

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| request_error("delete collection", e))?;
        if response.status() != StatusCode::NOT_FOUND {
            Self::check(response, "delete collection").await?;
        }

        let body = serde_json::json!({
            "vectors": {
                "size": dimensions,
                "distance": "Cosine"
            }
        });
        let response = self
            .http
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error("create collection", e))?;
        Self::check(response, "create collection").await?;

        debug!("Created collection {} ({} dims)", collection, dimensions);
        Ok(())
    }

    async fn collection_exists(&self, collection: &str) -> Result<bool> {
        let response = self
            .http
            .get(self.collection_url(collection))
            .send()
            .await
            .map_err(|e| request_error("get collection", e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            _ => {
                Self::check(response, "get collection").await?;
                Ok(true)
            }
        }
    }

    #[instrument(skip(self, points), fields(count = points.len()))]
    async fn upsert(&self, collection: &str, points: &[EmbeddedDocument]) -> Result<usize> {
        if points.is_empty() {
            return Ok(0);
        }

        let body: Vec<Point<'_>> = points
            .iter()
            .map(|p| Point {
                id: p.id,
                vector: &p.embedding,
                payload: &p.document,
            })
            .collect();

        let response = self
            .http
            .put(format!("{}/points", self.collection_url(collection)))
            .query(&[("wait", "true")])
            .json(&serde_json::json!({ "points": body }))
            .send()
            .await
            .map_err(|e| request_error("upsert", e))?;
        Self::check(response, "upsert").await?;

        Ok(points.len())
    }

    async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let response = self
            .http
            .post(format!("{}/points/search", self.collection_url(collection)))
            .json(&SearchRequest {
                vector: query_embedding,
                limit,
                with_payload: true,
            })
            .send()
            .await
            .map_err(|e| request_error("search", e))?;
        let response = Self::check(response, "search").await?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| request_error("search", e))?;

        Ok(body
            .result
            .into_iter()
            .filter_map(|entry| {
                entry.payload.map(|document| SearchResult {
                    document,
                    score: entry.score,
                })
            })
            .collect())
    }

    async fn point_count(&self, collection: &str) -> Result<usize> {
        let response = self
            .http
            .get(self.collection_url(collection))
            .send()
            .await
            .map_err(|e| request_error("get collection", e))?;
        let response = Self::check(response, "get collection").await?;

        let body: CollectionResponse = response
            .json()
            .await
            .map_err(|e| request_error("get collection", e))?;
        Ok(body.result.points_count.unwrap_or(0))
    }
}
