//! OpenAI client configuration with sensible defaults.

use crate::error::{Result, YtChatError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client against an optional custom endpoint.
///
/// `api_base` lets the client talk to any OpenAI-compatible server
/// (e.g. Gemini's `/v1beta/openai` endpoint). The API key is read from
/// `OPENAI_API_KEY` by `OpenAIConfig`.
pub fn create_client_with(api_base: Option<&str>, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| YtChatError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::default();
    if let Some(base) = api_base.filter(|b| !b.is_empty()) {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}
