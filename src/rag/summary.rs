//! Whole-video summaries from a sample of the transcript.

use crate::config::Prompts;
use crate::document::{render_lines, Document};
use crate::error::Result;
use crate::llm::ChatModel;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Transcripts longer than this are sampled instead of sent whole.
const SAMPLE_THRESHOLD: usize = 50;
/// Documents taken from each of the start, middle and end.
const SAMPLE_WINDOW: usize = 10;

/// Pick the documents that go into the summary prompt.
///
/// Above the threshold: the first ten, the ten centred on the midpoint and the
/// last ten, in that order. Windows are not deduplicated.
pub fn sample_documents(documents: &[Document]) -> Vec<&Document> {
    let total = documents.len();
    if total <= SAMPLE_THRESHOLD {
        return documents.iter().collect();
    }

    let half = SAMPLE_WINDOW / 2;
    let mid = total / 2;
    documents[..SAMPLE_WINDOW]
        .iter()
        .chain(&documents[mid - half..mid + half])
        .chain(&documents[total - SAMPLE_WINDOW..])
        .collect()
}

/// Produces one summary per video with a single completion.
pub struct Summarizer {
    llm: Arc<dyn ChatModel>,
    prompts: Prompts,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn ChatModel>, prompts: Prompts) -> Self {
        Self { llm, prompts }
    }

    /// Summarize a video from its documents.
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn summarize(&self, documents: &[Document]) -> Result<String> {
        let sampled = sample_documents(documents);
        let combined = render_lines(sampled.iter().copied());

        if combined.trim().is_empty() {
            return Ok(self.prompts.summary.empty.clone());
        }

        debug!("Summarizing {} of {} documents", sampled.len(), documents.len());
        self.llm.complete(&self.prompts.summary.system, &combined).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_documents;
    use crate::testing::{numbered_segments, RecordingChat};

    fn docs(count: usize) -> Vec<Document> {
        build_documents("vid", &numbered_segments(count))
    }

    #[test]
    fn test_sample_hundred() {
        let docs = docs(100);
        let sampled: Vec<String> = sample_documents(&docs)
            .iter()
            .map(|d| d.content.clone())
            .collect();

        let expected: Vec<String> = (0..10)
            .chain(45..55)
            .chain(90..100)
            .map(|i| format!("segment {}", i))
            .collect();
        assert_eq!(sampled, expected);
    }

    #[test]
    fn test_sample_small_uses_everything() {
        assert_eq!(sample_documents(&docs(30)).len(), 30);
        assert_eq!(sample_documents(&docs(50)).len(), 50);
    }

    #[test]
    fn test_sample_overlapping_windows() {
        let docs = docs(51);
        let sampled = sample_documents(&docs);
        assert_eq!(sampled.len(), 30);
        // Middle window is 20..30; last window starts at 41
        assert_eq!(sampled[10].content, "segment 20");
        assert_eq!(sampled[20].content, "segment 41");
    }

    #[tokio::test]
    async fn test_summarize_sends_sampled_block() {
        let chat = Arc::new(RecordingChat::replying("A video about segments."));
        let summarizer = Summarizer::new(chat.clone(), Prompts::default());

        let summary = summarizer.summarize(&docs(3)).await.unwrap();
        assert_eq!(summary, "A video about segments.");

        let (system, user) = chat.last_call().unwrap();
        assert!(system.contains("comprehensive summary"));
        assert_eq!(
            user,
            "[00:00:00.00] segment 0\n[00:00:10.00] segment 1\n[00:00:20.00] segment 2"
        );
    }

    #[tokio::test]
    async fn test_summarize_empty_skips_model() {
        let chat = Arc::new(RecordingChat::replying("unused"));
        let summarizer = Summarizer::new(chat.clone(), Prompts::default());

        let summary = summarizer.summarize(&[]).await.unwrap();
        assert_eq!(summary, "No transcript content available to summarize.");
        assert_eq!(chat.call_count(), 0);
    }
}
