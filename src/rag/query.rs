//! Grounded answers to questions about a single video.

use crate::config::Prompts;
use crate::document::render_lines;
use crate::error::Result;
use crate::llm::ChatModel;
use crate::session::VideoSession;
use crate::vector_store::{SearchResult, VideoIndex};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Number of transcript chunks retrieved per question.
pub const TOP_K: usize = 8;

/// Answers questions against a cached video session.
pub struct QueryHandler {
    llm: Arc<dyn ChatModel>,
    prompts: Prompts,
}

impl QueryHandler {
    pub fn new(llm: Arc<dyn ChatModel>, prompts: Prompts) -> Self {
        Self { llm, prompts }
    }

    /// Answer `question` about the video in `session`.
    ///
    /// Questions mentioning "summary" get the cached summary back without
    /// retrieval or a model call.
    #[instrument(skip(self, session), fields(video_id = %session.video_id))]
    pub async fn answer(&self, session: &VideoSession, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Ok(self.prompts.rag.empty_question.clone());
        }

        if question.to_lowercase().contains("summary") {
            debug!("Returning cached summary");
            return Ok(format!("{}{}", self.prompts.rag.summary_header, session.summary));
        }

        let index = VideoIndex::from_existing_collection(
            session.index.store(),
            session.index.embedder(),
            &VideoIndex::collection_name(&session.video_id),
        )
        .await?;

        let chunks = index.similarity_search(question, TOP_K).await?;
        info!("Retrieved {} transcript chunks", chunks.len());

        let system = self.grounding_prompt(&session.summary, &chunks);
        self.llm.complete(&system, question).await
    }

    /// Build the system turn from the summary and retrieved chunks.
    pub fn grounding_prompt(&self, summary: &str, chunks: &[SearchResult]) -> String {
        let context = if chunks.is_empty() {
            self.prompts.rag.no_context.clone()
        } else {
            render_lines(chunks.iter().map(|c| &c.document))
        };

        let vars = HashMap::from([
            ("summary".to_string(), summary.to_string()),
            ("context".to_string(), context),
        ]);
        self.prompts.render_with_custom(&self.prompts.rag.system, &vars)
    }
}
