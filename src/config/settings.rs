//! Configuration settings for ytchat.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub server: ServerSettings,
    pub cors: CorsSettings,
    pub transcript: TranscriptSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub llm: LlmSettings,
    pub prompts: PromptSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Cross-origin settings for the browser front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    /// Deployed front-end origin (usually from `FRONTEND_URL`).
    pub frontend_url: String,
    /// Local development origins that are always allowed.
    pub dev_origins: Vec<String>,
    /// Regex for preview-deployment origins.
    pub origin_pattern: String,
    /// How long browsers may cache a preflight response.
    pub max_age_seconds: u64,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            frontend_url: String::new(),
            dev_origins: vec![
                "http://localhost:3000".to_string(),
                "https://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            origin_pattern: r"^https://.*\.vercel\.app$".to_string(),
            max_age_seconds: 86400,
        }
    }
}

impl CorsSettings {
    /// All exact origins that may call the API.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = Vec::with_capacity(self.dev_origins.len() + 1);
        let frontend = self.frontend_url.trim_end_matches('/');
        if !frontend.is_empty() {
            origins.push(frontend.to_string());
        }
        for origin in &self.dev_origins {
            if !origins.contains(origin) {
                origins.push(origin.clone());
            }
        }
        origins
    }
}

/// Transcript fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Accepted caption languages, in order of preference.
    pub languages: Vec<String>,
    /// Timeout for each request to YouTube.
    pub timeout_seconds: u64,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            timeout_seconds: 30,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions. Vectors of any other length are not indexed.
    pub dimensions: u32,
    /// Number of documents embedded per request.
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 768,
            batch_size: 100,
        }
    }
}

/// Vector store backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreProvider {
    /// Remote Qdrant instance over its REST API.
    #[default]
    Qdrant,
    /// In-process store, lost on restart.
    Memory,
}

impl std::str::FromStr for VectorStoreProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qdrant" => Ok(VectorStoreProvider::Qdrant),
            "memory" => Ok(VectorStoreProvider::Memory),
            _ => Err(format!("Unknown vector store provider: {}", s)),
        }
    }
}

impl std::fmt::Display for VectorStoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorStoreProvider::Qdrant => write!(f, "qdrant"),
            VectorStoreProvider::Memory => write!(f, "memory"),
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct VectorStoreSettings {
    /// Vector store provider (qdrant, memory).
    pub provider: VectorStoreProvider,
    /// Qdrant base URL (usually from `QDRANT_URL`).
    pub url: Option<String>,
    /// Qdrant API key (usually from `QDRANT_API_KEY`).
    pub api_key: Option<String>,
}

/// Chat model settings shared by the summarizer and the query handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat completion model.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Retries after a failed completion request.
    pub max_retries: u32,
    /// OpenAI-compatible endpoint. Uses api.openai.com when unset.
    pub api_base: Option<String>,
    /// Timeout for each API request.
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_retries: 2,
            api_base: None,
            timeout_seconds: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied on top of the file.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> crate::error::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("FRONTEND_URL") {
            self.cors.frontend_url = url;
        }
        if let Some(url) = lookup("QDRANT_URL").filter(|v| !v.is_empty()) {
            self.vector_store.url = Some(url);
        }
        if let Some(key) = lookup("QDRANT_API_KEY").filter(|v| !v.is_empty()) {
            self.vector_store.api_key = Some(key);
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| crate::error::YtChatError::Config(format!("Invalid PORT: {}", port)))?;
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::YtChatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ytchat")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.llm.temperature, 0.0);
        assert_eq!(settings.llm.max_retries, 2);
        assert_eq!(settings.embedding.dimensions, 768);
        assert_eq!(settings.transcript.languages, vec!["en".to_string()]);
        assert_eq!(settings.vector_store.provider, VectorStoreProvider::Qdrant);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FRONTEND_URL", "https://app.example.com/"),
            ("QDRANT_URL", "http://qdrant:6333"),
            ("QDRANT_API_KEY", "secret"),
            ("PORT", "9001"),
        ]);

        let mut settings = Settings::default();
        settings
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.vector_store.url.as_deref(), Some("http://qdrant:6333"));
        assert_eq!(settings.vector_store.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.server.port, 9001);
        assert_eq!(
            settings.cors.allowed_origins()[0],
            "https://app.example.com".to_string()
        );
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let mut settings = Settings::default();
        let result = settings.apply_env(|k| (k == "PORT").then(|| "eighty".to_string()));
        assert!(matches!(result, Err(crate::error::YtChatError::Config(_))));
    }

    #[test]
    fn test_allowed_origins_without_frontend() {
        let cors = CorsSettings::default();
        assert_eq!(cors.allowed_origins().len(), 3);
        assert!(cors.allowed_origins().contains(&"http://localhost:3000".to_string()));
    }

    #[test]
    fn test_partial_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [llm]
            model = "gemini-2.0-flash"

            [vector_store]
            provider = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(settings.llm.model, "gemini-2.0-flash");
        assert_eq!(settings.llm.max_retries, 2);
        assert_eq!(settings.vector_store.provider, VectorStoreProvider::Memory);
        assert_eq!(settings.embedding.batch_size, 100);
    }

    #[test]
    fn test_save_and_load_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.server.port = 8123;
        settings.save_to(&path).unwrap();

        let loaded: Settings = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.server.port, 8123);
    }
}
