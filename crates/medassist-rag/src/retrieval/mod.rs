//! Retrieval over the active document index

mod index;
mod policy;

pub use index::{IndexStatus, IndexStore};
pub use policy::{FallbackPolicy, QnaOutcome, NO_DOCUMENT_MESSAGE};

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Chunk;

/// Lifecycle of the active index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// No document has been indexed since startup
    Uninitialized,
    /// A document was indexed but produced no chunks
    Empty,
    /// Index holds this many chunks
    Ready(usize),
}

impl IndexState {
    /// True once any document has been indexed
    pub fn is_ready(&self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    /// Number of indexed chunks
    pub fn chunk_count(&self) -> usize {
        match self {
            Self::Ready(n) => *n,
            _ => 0,
        }
    }

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Empty => "empty",
            Self::Ready(_) => "ready",
        }
    }
}

/// Chunk returned by a similarity search
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is closer)
    pub similarity: f32,
}

/// Result of one search, taken from a single index snapshot
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// State of the snapshot that was searched
    pub state: IndexState,
    /// Nearest chunks first; empty unless `state` is `Ready`
    pub chunks: Vec<RetrievedChunk>,
}

/// Source of chunks for the fallback policy
#[async_trait]
pub trait ChunkRetriever: Send + Sync {
    /// Up to `k` chunks nearest to `query`, with the state of the same snapshot
    ///
    /// Nothing is embedded when the snapshot holds no chunks.
    async fn search(&self, query: &str, k: usize) -> Result<Retrieval>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_state_readiness() {
        assert!(!IndexState::Uninitialized.is_ready());
        assert!(IndexState::Empty.is_ready());
        assert!(IndexState::Ready(4).is_ready());
        assert_eq!(IndexState::Ready(4).chunk_count(), 4);
        assert_eq!(IndexState::Empty.chunk_count(), 0);
        assert_eq!(IndexState::Ready(1).as_str(), "ready");
    }
}
