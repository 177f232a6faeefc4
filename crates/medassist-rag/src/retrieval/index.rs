//! In-memory similarity index over the chunks of the current document

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;

use super::{ChunkRetriever, IndexState, Retrieval, RetrievedChunk};
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::{Chunk, DocumentInfo};

/// Snapshot of the index exposed by GET /index-status
#[derive(Debug, Clone)]
pub struct IndexStatus {
    /// Current state
    pub state: IndexState,
    /// Incremented on every successful rebuild
    pub version: u64,
    /// Document the index was built from
    pub document: Option<DocumentInfo>,
}

#[derive(Default)]
struct IndexSnapshot {
    document: Option<DocumentInfo>,
    entries: Vec<IndexEntry>,
    version: u64,
}

struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

impl IndexSnapshot {
    fn state(&self) -> IndexState {
        match (&self.document, self.entries.len()) {
            (None, _) => IndexState::Uninitialized,
            (Some(_), 0) => IndexState::Empty,
            (Some(_), n) => IndexState::Ready(n),
        }
    }
}

/// Index store holding exactly one document at a time
///
/// Readers take a cheap `Arc` clone of the current snapshot, so a query
/// that started before a rebuild finishes against the old index. Rebuilds
/// are serialized; a failed rebuild leaves the previous snapshot active.
pub struct IndexStore {
    embedder: Arc<dyn EmbeddingProvider>,
    current: RwLock<Arc<IndexSnapshot>>,
    writer: Mutex<()>,
}

impl IndexStore {
    /// Create an uninitialized store
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            current: RwLock::new(Arc::new(IndexSnapshot::default())),
            writer: Mutex::new(()),
        }
    }

    fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.current.read().clone()
    }

    /// Replace the active index with one built from `chunks`
    ///
    /// Returns the status of the snapshot this call installed, which a
    /// later rebuild may already have replaced by the time it is read.
    pub async fn rebuild(&self, document: DocumentInfo, chunks: Vec<Chunk>) -> Result<IndexStatus> {
        let _guard = self.writer.lock().await;

        let entries = if chunks.is_empty() {
            Vec::new()
        } else {
            let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            pair_embeddings(chunks, embeddings, self.embedder.dimensions())?
        };

        let version = self.snapshot().version + 1;
        let snapshot = Arc::new(IndexSnapshot {
            document: Some(document),
            entries,
            version,
        });
        let status = IndexStatus {
            state: snapshot.state(),
            version,
            document: snapshot.document.clone(),
        };

        *self.current.write() = snapshot;

        tracing::info!(
            "Index rebuilt: version {}, {} chunks ({})",
            version,
            status.state.chunk_count(),
            self.embedder.name()
        );

        Ok(status)
    }

    /// Current state
    pub fn state(&self) -> IndexState {
        self.snapshot().state()
    }

    /// True once any document has been indexed
    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    /// Current state, version and document
    pub fn status(&self) -> IndexStatus {
        let snapshot = self.snapshot();
        IndexStatus {
            state: snapshot.state(),
            version: snapshot.version,
            document: snapshot.document.clone(),
        }
    }

    /// Up to `k` chunks nearest to `query` by cosine similarity
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        let snapshot = self.snapshot();
        if snapshot.document.is_none() {
            return Err(Error::NoIndexAvailable);
        }
        self.nearest(&snapshot, query, k).await
    }

    async fn nearest(&self, snapshot: &IndexSnapshot, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        if snapshot.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        let expected = snapshot.entries[0].embedding.len();
        if query_embedding.len() != expected {
            return Err(Error::embedding(format!(
                "Query embedding has {} dimensions, index has {}",
                query_embedding.len(),
                expected
            )));
        }

        let mut scored: Vec<RetrievedChunk> = snapshot
            .entries
            .iter()
            .map(|entry| {
                let mut similarity = cosine_similarity(&query_embedding, &entry.embedding);
                if similarity.is_nan() {
                    similarity = f32::NEG_INFINITY;
                }
                RetrievedChunk {
                    chunk: entry.chunk.clone(),
                    similarity,
                }
            })
            .collect();

        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(k);

        tracing::debug!("Retrieved {} chunks for query", scored.len());

        Ok(scored)
    }
}

#[async_trait]
impl ChunkRetriever for IndexStore {
    async fn search(&self, query: &str, k: usize) -> Result<Retrieval> {
        let snapshot = self.snapshot();
        let state = snapshot.state();
        let chunks = self.nearest(&snapshot, query, k).await?;
        Ok(Retrieval { state, chunks })
    }
}

/// Pair chunks with their vectors; `expected` of zero accepts any dimension
fn pair_embeddings(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>, expected: usize) -> Result<Vec<IndexEntry>> {
    if embeddings.len() != chunks.len() {
        return Err(Error::embedding(format!(
            "Expected {} embeddings, got {}",
            chunks.len(),
            embeddings.len()
        )));
    }

    let dimension = embeddings.first().map(Vec::len).unwrap_or(0);
    if dimension == 0 || embeddings.iter().any(|e| e.len() != dimension) {
        return Err(Error::embedding("Inconsistent embedding dimensions"));
    }
    if expected != 0 && dimension != expected {
        return Err(Error::embedding(format!(
            "Embedding model returned {} dimensions, expected {}",
            dimension, expected
        )));
    }

    Ok(chunks
        .into_iter()
        .zip(embeddings)
        .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
        .collect())
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
