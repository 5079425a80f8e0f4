//! Pipeline orchestrator for ytchat.
//!
//! Coordinates ingestion (transcript to indexed session) and question answering.

use crate::config::{Prompts, Settings};
use crate::document::{build_documents, render_lines};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, YtChatError};
use crate::llm::{ChatModel, OpenAIChat};
use crate::rag::{QueryHandler, Summarizer};
use crate::session::{SessionCache, VideoSession};
use crate::transcript::{extract_video_id, TranscriptFetcher, YoutubeTranscriptFetcher};
use crate::vector_store::{create_vector_store, VectorStore, VideoIndex};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// The main orchestrator for the ytchat pipeline.
pub struct Orchestrator {
    settings: Settings,
    fetcher: Arc<dyn TranscriptFetcher>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    summarizer: Summarizer,
    query_handler: QueryHandler,
    cache: SessionCache,
}

impl Orchestrator {
    /// Create an orchestrator with the configured collaborators.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let fetcher: Arc<dyn TranscriptFetcher> = Arc::new(YoutubeTranscriptFetcher::new(
            Duration::from_secs(settings.transcript.timeout_seconds),
        )?);
        let embedder: Arc<dyn Embedder> =
            Arc::new(OpenAIEmbedder::from_settings(&settings.embedding, &settings.llm)?);
        let vector_store = create_vector_store(
            &settings.vector_store,
            Duration::from_secs(settings.llm.timeout_seconds),
        )?;
        let llm: Arc<dyn ChatModel> = Arc::new(OpenAIChat::from_settings(&settings.llm)?);

        info!(
            "Using {} vector store, {} for chat",
            settings.vector_store.provider, settings.llm.model
        );

        Ok(Self::with_components(
            settings,
            prompts,
            fetcher,
            embedder,
            vector_store,
            llm,
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        fetcher: Arc<dyn TranscriptFetcher>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        llm: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            embedder,
            vector_store,
            summarizer: Summarizer::new(llm.clone(), prompts.clone()),
            query_handler: QueryHandler::new(llm, prompts),
            cache: SessionCache::new(),
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the session cache.
    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Fetch, index and summarize a video. Does not touch the cache.
    #[instrument(skip(self), fields(url = %video_url))]
    pub async fn ingest(&self, video_url: &str) -> Result<VideoSession> {
        let video_id = extract_video_id(video_url)
            .ok_or_else(|| YtChatError::InvalidUrl(video_url.to_string()))?;

        info!("Fetching transcript for {}", video_id);
        let segments = self
            .fetcher
            .fetch(&video_id, &self.settings.transcript.languages)
            .await?;
        if segments.is_empty() {
            return Err(YtChatError::TranscriptUnavailable(format!(
                "{}: transcript is empty",
                video_id
            )));
        }

        let documents = build_documents(&video_id, &segments);
        info!("Built {} documents", documents.len());

        let index = VideoIndex::from_documents(
            self.vector_store.clone(),
            self.embedder.clone(),
            &video_id,
            &documents,
            self.settings.embedding.batch_size,
        )
        .await?;

        let summary = self.summarizer.summarize(&documents).await?;
        let full_transcript = render_lines(&documents);

        Ok(VideoSession {
            video_id,
            index,
            documents,
            summary,
            full_transcript,
            ingested_at: Utc::now(),
        })
    }

    /// Ingest a video and cache its session, replacing any earlier one.
    pub async fn load_video(&self, video_url: &str) -> Result<Arc<VideoSession>> {
        let session = self.ingest(video_url).await?;
        Ok(self.cache.insert(session).await)
    }

    /// Answer a question about a video that was loaded earlier.
    #[instrument(skip(self, question))]
    pub async fn ask(&self, video_id: &str, question: &str) -> Result<String> {
        let session = self
            .cache
            .get(video_id)
            .await
            .ok_or_else(|| YtChatError::NotFound("Video not processed yet.".to_string()))?;

        self.query_handler.answer(&session, question).await
    }
}
