//! Transcript sources for ytchat.
//!
//! Provides video-ID extraction and a trait-based interface for fetching
//! timed caption segments.

mod youtube;

pub use youtube::YoutubeTranscriptFetcher;

use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// An 11-character video ID after a `v=` or `/` marker.
static VIDEO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("Invalid regex"));

/// A single caption line with its start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start_time: f64,
    /// Caption text.
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            text: text.into(),
        }
    }
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch the transcript of a video in the first available language.
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Vec<TranscriptSegment>>;
}

/// Extract the video ID from a YouTube URL.
///
/// Accepts `watch?v=`, `youtu.be/`, `/embed/` and `/shorts/` forms with any
/// surrounding query parameters. Returns `None` when no ID is present.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s&list=PL123",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abcdef",
            "youtube.com/embed/dQw4w9WgXcQ",
            "https://m.youtube.com/shorts/dQw4w9WgXcQ",
        ];

        for url in cases {
            assert_eq!(
                extract_video_id(url),
                Some("dQw4w9WgXcQ".to_string()),
                "failed for {}",
                url
            );
        }
    }

    #[test]
    fn test_extract_ids_with_hyphen_and_underscore() {
        assert_eq!(
            extract_video_id("https://youtu.be/a-b_c-d_e-f"),
            Some("a-b_c-d_e-f".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_invalid() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id("https://youtu.be/short"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=abc"), None);
        // A bare ID has no marker in front of it
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), None);
    }
}
