//! YouTube caption fetching over the InnerTube player API.

use super::{TranscriptFetcher, TranscriptSegment};
use crate::error::{Result, YtChatError};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

static API_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("Invalid regex")
});

/// A caption track listed by the player response.
#[derive(Debug, Clone)]
struct CaptionTrack {
    language_code: String,
    base_url: String,
    is_generated: bool,
}

/// Timed-text body in YouTube's `json3` format.
#[derive(Debug, Deserialize)]
struct Json3Body {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Fetches captions the same way the YouTube Android client does.
pub struct YoutubeTranscriptFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl YoutubeTranscriptFetcher {
    /// Create a fetcher with a per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US"),
        );

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| YtChatError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the fetcher at a different host.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let url = format!("{}/watch?v={}", self.base_url, video_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(video_id, format!("failed to fetch watch page: {}", e)))?;

        if !response.status().is_success() {
            return Err(unavailable(
                video_id,
                format!("watch page returned {}", response.status()),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| unavailable(video_id, format!("failed to read watch page: {}", e)))
    }

    fn extract_api_key(html: &str, video_id: &str) -> Result<String> {
        if html.contains("g-recaptcha") {
            return Err(unavailable(video_id, "YouTube is blocking requests from this IP"));
        }

        API_KEY_REGEX
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| unavailable(video_id, "could not find the player API key"))
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<serde_json::Value> {
        let url = format!("{}/youtubei/v1/player?key={}", self.base_url, api_key);
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| unavailable(video_id, format!("player request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(unavailable(
                video_id,
                format!("player request returned {}", response.status()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| unavailable(video_id, format!("unparsable player response: {}", e)))
    }

    fn caption_tracks(video_id: &str, player: &serde_json::Value) -> Result<Vec<CaptionTrack>> {
        if let Some(status) = player["playabilityStatus"]["status"].as_str() {
            if status != "OK" {
                let reason = player["playabilityStatus"]["reason"]
                    .as_str()
                    .unwrap_or(status);
                return Err(unavailable(video_id, format!("video is not playable: {}", reason)));
            }
        }

        let tracks: Vec<CaptionTrack> = player["captions"]["playerCaptionsTracklistRenderer"]
            ["captionTracks"]
            .as_array()
            .map(|tracks| {
                tracks
                    .iter()
                    .filter_map(|track| {
                        Some(CaptionTrack {
                            language_code: track["languageCode"].as_str()?.to_string(),
                            base_url: track["baseUrl"].as_str()?.replace("&fmt=srv3", ""),
                            is_generated: track["kind"].as_str() == Some("asr"),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        if tracks.is_empty() {
            return Err(unavailable(video_id, "captions are disabled for this video"));
        }

        Ok(tracks)
    }

    /// Pick a track in the preferred languages, manual captions before generated ones.
    fn select_track<'a>(
        video_id: &str,
        tracks: &'a [CaptionTrack],
        languages: &[String],
    ) -> Result<&'a CaptionTrack> {
        for language in languages {
            let matching = || tracks.iter().filter(|t| &t.language_code == language);
            if let Some(track) = matching()
                .find(|t| !t.is_generated)
                .or_else(|| matching().next())
            {
                return Ok(track);
            }
        }

        Err(unavailable(
            video_id,
            format!("no transcript in requested languages {:?}", languages),
        ))
    }

    async fn fetch_segments(&self, video_id: &str, track: &CaptionTrack) -> Result<Vec<TranscriptSegment>> {
        let url = format!("{}&fmt=json3", track.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(video_id, format!("caption request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(unavailable(
                video_id,
                format!("caption request returned {}", response.status()),
            ));
        }

        let body: Json3Body = response
            .json()
            .await
            .map_err(|e| unavailable(video_id, format!("unparsable captions: {}", e)))?;

        Ok(parse_events(body))
    }
}

/// Events without `segs` are window and style markers. Events whose text is
/// blank are kept so they still show up as timestamped segments.
fn parse_events(body: Json3Body) -> Vec<TranscriptSegment> {
    body.events
        .into_iter()
        .filter(|event| !event.segs.is_empty())
        .map(|event| {
            let text = event
                .segs
                .iter()
                .map(|s| s.utf8.as_str())
                .collect::<String>()
                .replace('\n', " ");
            TranscriptSegment::new(event.start_ms as f64 / 1000.0, text.trim())
        })
        .collect()
}

fn unavailable(video_id: &str, reason: impl std::fmt::Display) -> YtChatError {
    YtChatError::TranscriptUnavailable(format!("{}: {}", video_id, reason))
}

#[async_trait]
impl TranscriptFetcher for YoutubeTranscriptFetcher {
    #[instrument(skip(self, languages))]
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Vec<TranscriptSegment>> {
        let html = self.fetch_watch_page(video_id).await?;
        let api_key = Self::extract_api_key(&html, video_id)?;
        let player = self.fetch_player(video_id, &api_key).await?;

        let tracks = Self::caption_tracks(video_id, &player)?;
        let track = Self::select_track(video_id, &tracks, languages)?;
        debug!(
            "Using {} captions ({})",
            track.language_code,
            if track.is_generated { "generated" } else { "manual" }
        );

        self.fetch_segments(video_id, track).await
    }
}
