//! Configuration for the medical assistant service

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Hosted LLM configuration
    pub llm: LlmConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Upload processing configuration
    pub ingestion: IngestionConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes (default: 20MB)
    pub max_upload_size: usize,
    /// Cross-origin policy
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_size: 20 * 1024 * 1024,
            cors: CorsConfig::default(),
        }
    }
}

/// Cross-origin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; a single "*" allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    /// Whether every origin is permitted
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Hosted LLM (Gemini) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// API key, normally supplied through GOOGLE_API_KEY
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for transient failures
    pub max_retries: u32,
    /// Base delay between retries in milliseconds (doubles each attempt)
    pub retry_base_delay_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            generate_model: "gemini-2.5-flash".to_string(),
            temperature: 0.0,
            timeout_secs: 60,
            max_retries: 2,
            retry_base_delay_ms: 500,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (768 for embedding-001); 0 skips the rebuild check
    pub dimensions: usize,
    /// Maximum texts per batch request
    pub batch_size: usize,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "embedding-001".to_string(),
            dimensions: 768,
            batch_size: 100,
            timeout_secs: 60,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunks retrieved per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Upload processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Timeout for PDF text extraction in seconds
    pub extraction_timeout_secs: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            extraction_timeout_secs: 60,
        }
    }
}

impl RagConfig {
    /// Load configuration: defaults, then an optional TOML file, then the environment
    ///
    /// The file path falls back to `MEDASSIST_CONFIG` when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var("MEDASSIST_CONFIG").ok();
        let path = path.or(env_path.as_deref().map(Path::new));

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse TOML configuration text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GOOGLE_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(host) = lookup("MEDASSIST_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("MEDASSIST_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid MEDASSIST_PORT: {}", port)))?;
        }
        if let Some(origins) = lookup("MEDASSIST_CORS_ORIGINS") {
            self.server.cors.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(model) = lookup("MEDASSIST_LLM_MODEL") {
            self.llm.generate_model = model;
        }
        if let Some(model) = lookup("MEDASSIST_EMBED_MODEL") {
            self.embeddings.model = model;
        }
        Ok(())
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.trim().is_empty() {
            return Err(Error::Config(
                "GOOGLE_API_KEY not found. Set it in the environment or a .env file".to_string(),
            ));
        }
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be greater than 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be greater than 0".to_string()));
        }
        if self.server.cors.allowed_origins.is_empty() {
            return Err(Error::Config("server.cors.allowed_origins must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_pipeline_policy() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.llm.temperature, 0.0);
        assert!(config.server.cors.allows_any());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RagConfig::from_toml(
            r#"
            [server]
            port = 9000

            [server.cors]
            allowed_origins = ["http://localhost:5173"]
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.server.cors.allows_any());
        assert_eq!(config.chunking.chunk_size, 1000);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GOOGLE_API_KEY", "secret"),
            ("MEDASSIST_PORT", "8081"),
            ("MEDASSIST_CORS_ORIGINS", "http://a.test, http://b.test"),
        ]
        .into_iter()
        .collect();

        let mut config = RagConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.llm.api_key, "secret");
        assert_eq!(config.server.port, 8081);
        assert_eq!(
            config.server.cors.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut config = RagConfig::default();
        let result = config.apply_env(|key| (key == "MEDASSIST_PORT").then(|| "eighty".to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_requires_api_key() {
        let config = RagConfig::default();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
