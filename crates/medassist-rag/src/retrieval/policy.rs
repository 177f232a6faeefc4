//! Decides between a document-grounded answer and a general one

use std::sync::Arc;

use crate::error::Result;
use crate::generation::CompletionGateway;

use super::{ChunkRetriever, IndexState};

/// Reply when a question arrives before any document upload
pub const NO_DOCUMENT_MESSAGE: &str = "⚠️ No document uploaded yet. Please upload a document first.";

/// Result of answering a document question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QnaOutcome {
    /// No document has been indexed
    NoDocument,
    /// Answered without document context
    General(String),
    /// Answered with retrieved chunks as context
    Grounded {
        /// Model reply
        reply: String,
        /// Number of chunks in the context
        chunks_used: usize,
    },
}

impl QnaOutcome {
    /// Text shown to the user
    pub fn reply(&self) -> &str {
        match self {
            Self::NoDocument => NO_DOCUMENT_MESSAGE,
            Self::General(reply) => reply,
            Self::Grounded { reply, .. } => reply,
        }
    }
}

/// Retrieval-fallback policy for document Q&A
pub struct FallbackPolicy {
    retriever: Arc<dyn ChunkRetriever>,
    gateway: Arc<CompletionGateway>,
    top_k: usize,
}

impl FallbackPolicy {
    /// Create a policy retrieving `top_k` chunks per question
    pub fn new(retriever: Arc<dyn ChunkRetriever>, gateway: Arc<CompletionGateway>, top_k: usize) -> Self {
        Self {
            retriever,
            gateway,
            top_k,
        }
    }

    /// Answer `query` from the document when it yields usable text,
    /// otherwise from general knowledge
    pub async fn answer(&self, query: &str) -> Result<QnaOutcome> {
        let retrieval = self.retriever.search(query, self.top_k).await?;

        // An upload that produced no chunks leaves nothing to ground on
        match retrieval.state {
            IndexState::Uninitialized | IndexState::Empty => {
                tracing::info!("Document question with no indexed content");
                return Ok(QnaOutcome::NoDocument);
            }
            IndexState::Ready(_) => {}
        }

        let texts: Vec<&str> = retrieval
            .chunks
            .iter()
            .filter(|r| !r.chunk.is_blank())
            .map(|r| r.chunk.text.as_str())
            .collect();

        if texts.is_empty() {
            tracing::warn!("No usable chunks retrieved; answering from general knowledge");
            let reply = self.gateway.complete(query, None).await?;
            return Ok(QnaOutcome::General(reply));
        }

        // Context keeps retrieval order, nearest first
        let context = texts.join("\n\n");
        tracing::info!("Answering from {} retrieved chunks", texts.len());
        let reply = self.gateway.complete(query, Some(&context)).await?;

        Ok(QnaOutcome::Grounded {
            reply,
            chunks_used: texts.len(),
        })
    }
}
