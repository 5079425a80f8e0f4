//! Timestamped transcript documents.

use crate::transcript::TranscriptSegment;
use serde::{Deserialize, Serialize};

/// Text used for segments whose caption is blank.
pub const INAUDIBLE: &str = "[Inaudible]";

/// One transcript segment, ready for embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Caption text.
    pub content: String,
    /// Start of the segment as `HH:MM:SS.ss`.
    pub timestamp: String,
    /// Video this segment belongs to.
    pub video_id: String,
}

impl Document {
    /// Render as a `[timestamp] content` line.
    pub fn to_line(&self) -> String {
        format!("[{}] {}", self.timestamp, self.content)
    }
}

/// Format seconds as `HH:MM:SS.ss`.
///
/// Hours and minutes are whole numbers; seconds keep two decimal places and
/// are zero-padded to two integer digits.
pub fn format_timestamp(start_time: f64) -> String {
    let start_time = start_time.max(0.0);
    let hours = (start_time / 3600.0).floor();
    let minutes = ((start_time % 3600.0) / 60.0).floor();
    let seconds = start_time % 60.0;
    format!("{:02}:{:02}:{:05.2}", hours as u64, minutes as u64, seconds)
}

/// Build one document per transcript segment, in transcript order.
pub fn build_documents(video_id: &str, segments: &[TranscriptSegment]) -> Vec<Document> {
    segments
        .iter()
        .map(|segment| {
            let content = if segment.text.trim().is_empty() {
                INAUDIBLE.to_string()
            } else {
                segment.text.clone()
            };
            Document {
                content,
                timestamp: format_timestamp(segment.start_time),
                video_id: video_id.to_string(),
            }
        })
        .collect()
}

/// Join documents into `[timestamp] content` lines.
pub fn render_lines<'a>(docs: impl IntoIterator<Item = &'a Document>) -> String {
    docs.into_iter()
        .map(Document::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}
