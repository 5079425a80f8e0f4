//! Chat completion models.

mod openai;

pub use openai::OpenAIChat;

use crate::error::Result;
use async_trait::async_trait;

/// A chat model that answers one system + user exchange.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Request a single completion and return its text.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}
