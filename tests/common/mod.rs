//! Fakes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use ytchat::config::{Prompts, Settings};
use ytchat::embedding::Embedder;
use ytchat::llm::ChatModel;
use ytchat::orchestrator::Orchestrator;
use ytchat::transcript::{TranscriptFetcher, TranscriptSegment};
use ytchat::vector_store::MemoryVectorStore;
use ytchat::{Result, YtChatError};

pub const DIMENSIONS: usize = 64;

/// Embeds text as word counts hashed into a fixed number of buckets.
pub struct WordEmbedder;

impl WordEmbedder {
    fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; DIMENSIONS];
        for word in text.split_whitespace() {
            let word = word.to_lowercase();
            let bucket = word.bytes().map(|b| b as usize).sum::<usize>() % DIMENSIONS;
            v[bucket] += 1.0;
        }
        v
    }
}

#[async_trait]
impl Embedder for WordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }
}

/// Chat model that replies with a fixed string and keeps every prompt it saw.
#[derive(Default)]
pub struct ScriptedChat {
    pub reply: String,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedChat {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_system_prompt(&self) -> String {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .map(|(system, _)| system.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        Ok(self.reply.clone())
    }
}

/// Transcript source whose contents can be swapped between loads.
#[derive(Default)]
pub struct FakeTranscripts {
    pub transcripts: Mutex<HashMap<String, Vec<TranscriptSegment>>>,
}

impl FakeTranscripts {
    pub fn set(&self, video_id: &str, segments: Vec<TranscriptSegment>) {
        self.transcripts
            .lock()
            .unwrap()
            .insert(video_id.to_string(), segments);
    }
}

#[async_trait]
impl TranscriptFetcher for FakeTranscripts {
    async fn fetch(&self, video_id: &str, _languages: &[String]) -> Result<Vec<TranscriptSegment>> {
        self.transcripts
            .lock()
            .unwrap()
            .get(video_id)
            .cloned()
            .ok_or_else(|| YtChatError::TranscriptUnavailable(format!("{}: no captions", video_id)))
    }
}

/// The five-segment transcript used across tests.
pub fn sample_segments() -> Vec<TranscriptSegment> {
    vec![
        TranscriptSegment::new(0.0, "Welcome to the channel"),
        TranscriptSegment::new(4.2, "today we are baking sourdough bread"),
        TranscriptSegment::new(9.8, ""),
        TranscriptSegment::new(15.0, "first mix flour and water"),
        TranscriptSegment::new(3661.5, "and that is the finished loaf"),
    ]
}

/// An orchestrator wired to in-memory fakes.
pub fn orchestrator(
    transcripts: Arc<FakeTranscripts>,
    chat: Arc<ScriptedChat>,
) -> Orchestrator {
    Orchestrator::with_components(
        Settings::default(),
        Prompts::default(),
        transcripts,
        Arc::new(WordEmbedder),
        Arc::new(MemoryVectorStore::new()),
        chat,
    )
}
