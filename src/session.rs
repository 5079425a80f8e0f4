//! Indexed video sessions and the process-wide cache that holds them.
//!
//! The cache has no eviction: every ingested video stays until the process
//! exits. Concurrent ingestion of the same video is last-write-wins.

use crate::document::Document;
use crate::vector_store::VideoIndex;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Everything needed to answer questions about one ingested video.
#[derive(Debug, Clone)]
pub struct VideoSession {
    pub video_id: String,
    /// Vector collection and the embedder that filled it.
    pub index: VideoIndex,
    pub documents: Vec<Document>,
    pub summary: String,
    /// All documents as `[timestamp] content` lines.
    pub full_transcript: String,
    pub ingested_at: DateTime<Utc>,
}

/// Map from video ID to its session.
#[derive(Default)]
pub struct SessionCache {
    sessions: RwLock<HashMap<String, Arc<VideoSession>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session, replacing any earlier one for the same video.
    pub async fn insert(&self, session: VideoSession) -> Arc<VideoSession> {
        let session = Arc::new(session);
        self.sessions
            .write()
            .await
            .insert(session.video_id.clone(), session.clone());
        session
    }

    pub async fn get(&self, video_id: &str) -> Option<Arc<VideoSession>> {
        self.sessions.read().await.get(video_id).cloned()
    }

    pub async fn contains(&self, video_id: &str) -> bool {
        self.sessions.read().await.contains_key(video_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// All cached sessions, most recently ingested first.
    pub async fn sessions(&self) -> Vec<Arc<VideoSession>> {
        let mut sessions: Vec<_> = self.sessions.read().await.values().cloned().collect();
        sessions.sort_by(|a, b| b.ingested_at.cmp(&a.ingested_at));
        sessions
    }
}
