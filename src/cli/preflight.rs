//! Pre-flight checks before starting the server or a one-shot question.
//!
//! Catches missing credentials up front instead of halfway through an ingestion.

use crate::config::{Settings, VectorStoreProvider};
use crate::error::{Result, YtChatError};

/// Run all pre-flight checks for the given settings.
pub fn check(settings: &Settings) -> Result<()> {
    check_api_key(std::env::var("OPENAI_API_KEY").ok())?;
    check_vector_store(settings)?;
    Ok(())
}

/// Check that an OpenAI-compatible API key is configured.
fn check_api_key(key: Option<String>) -> Result<()> {
    match key {
        Some(key) if !key.is_empty() => Ok(()),
        Some(_) => Err(YtChatError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        None => Err(YtChatError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check that the vector store has what it needs to connect.
fn check_vector_store(settings: &Settings) -> Result<()> {
    match settings.vector_store.provider {
        VectorStoreProvider::Memory => Ok(()),
        VectorStoreProvider::Qdrant => match settings.vector_store.url.as_deref() {
            Some(url) if !url.is_empty() => Ok(()),
            _ => Err(YtChatError::Config(
                "QDRANT_URL not set. Set it, or use vector_store.provider = \"memory\"".to_string(),
            )),
        },
    }
}
