//! Prompt templates for ytchat.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("Invalid regex"));

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
    pub rag: RagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for whole-video summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub system: String,
    /// Returned instead of calling the model when there is nothing to summarize.
    pub empty: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            system: "Create a comprehensive summary of this YouTube video transcript. \
                     Focus on the main topics, key points, and overall structure of the video."
                .to_string(),
            empty: "No transcript content available to summarize.".to_string(),
        }
    }
}

/// Prompts for answering questions about a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    /// System turn template. Receives `{{summary}}` and `{{context}}`.
    pub system: String,
    /// Prefix for answers that return the cached summary directly.
    pub summary_header: String,
    /// Stands in for `{{context}}` when the search finds nothing.
    pub no_context: String,
    /// Reply to a blank question.
    pub empty_question: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a helpful AI Assistant who provides detailed information about YouTube videos.

Video Summary:
{{summary}}

Relevant Transcript Sections:
{{context}}

General Instructions:
- Answer the user's questions based on the transcript information
- Reference timestamps when discussing specific parts of the video
- If asked for a summary, provide the comprehensive video summary
- Your knowledge is limited to what's in this video transcript"#
                .to_string(),
            summary_header: "Here's a summary of the video:\n\n".to_string(),
            no_context: "No specific transcript sections found relevant to your query.".to_string(),
            empty_question: "Please provide a valid question about the video.".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass, so inserted values are never expanded
    /// again. Unknown placeholders are left as they are.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        PLACEHOLDER_REGEX
            .replace_all(template, |caps: &regex::Captures<'_>| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
