//! Configuration module for ytchat.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts, SummaryPrompts};
pub use settings::{
    CorsSettings, EmbeddingSettings, LlmSettings, PromptSettings, ServerSettings, Settings,
    TranscriptSettings, VectorStoreProvider, VectorStoreSettings,
};
