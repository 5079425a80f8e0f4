//! OpenAI chat completions with a fixed retry budget.

use super::ChatModel;
use crate::config::LlmSettings;
use crate::error::{Result, YtChatError};
use crate::openai::create_client_with;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Base delay between retries; doubles on each attempt.
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Chat model backed by an OpenAI-compatible endpoint.
pub struct OpenAIChat {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_retries: u32,
}

impl OpenAIChat {
    /// Create a chat model from settings.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let client = create_client_with(
            settings.api_base.as_deref(),
            Duration::from_secs(settings.timeout_seconds),
        )?;
        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_retries: settings.max_retries,
        })
    }

    /// Model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, system: &str, user: &str) -> Result<CreateChatCompletionRequest> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| YtChatError::Upstream(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(|e| YtChatError::Upstream(e.to_string()))?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| YtChatError::Upstream(e.to_string()))
    }
}

#[async_trait]
impl ChatModel for OpenAIChat {
    #[instrument(skip(self, system, user), fields(model = %self.model))]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = self.build_request(system, user)?;

        let mut attempt = 0;
        let response = loop {
            match self.client.chat().create(request.clone()).await {
                Ok(response) => break response,
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!("Completion failed (attempt {}): {}", attempt, e);
                    let delay = RETRY_BASE_DELAY_MS * 2u64.pow(attempt - 1);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => {
                    return Err(YtChatError::Upstream(format!(
                        "Failed to generate response: {}",
                        e
                    )))
                }
            }
        };

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| YtChatError::Upstream("Empty response from LLM".to_string()))?;

        debug!("Completion returned {} chars", answer.len());
        Ok(answer)
    }
}
