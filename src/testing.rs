//! In-process collaborators for unit tests.

use crate::embedding::Embedder;
use crate::error::{Result, YtChatError};
use crate::llm::ChatModel;
use crate::transcript::{TranscriptFetcher, TranscriptSegment};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Bag-of-words embedder: each word bumps one of `dimensions` buckets.
pub struct HashEmbedder {
    pub dimensions: usize,
    pub calls: AtomicUsize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: AtomicUsize::new(0),
        }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        // Lets tests provoke a malformed embedding
        if text.contains("BADVEC") {
            return vec![1.0];
        }
        let mut v = vec![0.0; self.dimensions];
        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            let bucket = word.bytes().map(|b| b as usize).sum::<usize>() % self.dimensions;
            v[bucket] += 1.0;
        }
        v
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Chat model that records prompts and replies with a canned answer.
#[derive(Default)]
pub struct RecordingChat {
    pub reply: String,
    pub fail: bool,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl RecordingChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<(String, String)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatModel for RecordingChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        if self.fail {
            return Err(YtChatError::Upstream("model unavailable".to_string()));
        }
        Ok(self.reply.clone())
    }
}

/// Transcript source backed by a fixed map of video IDs.
#[derive(Default)]
pub struct StaticTranscripts {
    pub transcripts: HashMap<String, Vec<TranscriptSegment>>,
}

impl StaticTranscripts {
    pub fn with(mut self, video_id: &str, segments: Vec<TranscriptSegment>) -> Self {
        self.transcripts.insert(video_id.to_string(), segments);
        self
    }
}

#[async_trait]
impl TranscriptFetcher for StaticTranscripts {
    async fn fetch(&self, video_id: &str, _languages: &[String]) -> Result<Vec<TranscriptSegment>> {
        self.transcripts.get(video_id).cloned().ok_or_else(|| {
            YtChatError::TranscriptUnavailable(format!("{}: captions are disabled", video_id))
        })
    }
}

/// `count` segments, one every ten seconds, with distinct text.
pub fn numbered_segments(count: usize) -> Vec<TranscriptSegment> {
    (0..count)
        .map(|i| TranscriptSegment::new(i as f64 * 10.0, format!("segment {}", i)))
        .collect()
}
