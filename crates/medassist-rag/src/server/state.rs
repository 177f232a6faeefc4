//! Application state for the HTTP server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::CompletionGateway;
use crate::ingestion::{DocumentLoader, TextChunker};
use crate::providers::{CompletionProvider, EmbeddingProvider, GeminiClient};
use crate::retrieval::{FallbackPolicy, IndexStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    loader: DocumentLoader,
    chunker: TextChunker,
    index: Arc<IndexStore>,
    gateway: Arc<CompletionGateway>,
    policy: FallbackPolicy,
}

impl AppState {
    /// Create state backed by the Gemini API
    pub fn new(config: RagConfig) -> Result<Self> {
        let gemini = Arc::new(GeminiClient::new(&config.llm, &config.embeddings)?);
        tracing::info!(
            "Gemini client initialized (chat: {}, embeddings: {})",
            config.llm.generate_model,
            config.embeddings.model
        );

        Self::with_providers(config, gemini.clone(), gemini)
    }

    /// Create state with explicit providers
    pub fn with_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn CompletionProvider>,
    ) -> Result<Self> {
        let loader = DocumentLoader::from_config(&config.ingestion);
        let chunker = TextChunker::from_config(&config.chunking)?;
        let index = Arc::new(IndexStore::new(embedder));
        let gateway = Arc::new(CompletionGateway::new(llm, &config.llm));
        let policy = FallbackPolicy::new(index.clone(), gateway.clone(), config.retrieval.top_k);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                loader,
                chunker,
                index,
                gateway,
                policy,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the document loader
    pub fn loader(&self) -> &DocumentLoader {
        &self.inner.loader
    }

    /// Get the chunker
    pub fn chunker(&self) -> &TextChunker {
        &self.inner.chunker
    }

    /// Get the index store
    pub fn index(&self) -> &IndexStore {
        &self.inner.index
    }

    /// Get the completion gateway
    pub fn gateway(&self) -> &CompletionGateway {
        &self.inner.gateway
    }

    /// Get the retrieval-fallback policy
    pub fn policy(&self) -> &FallbackPolicy {
        &self.inner.policy
    }
}
