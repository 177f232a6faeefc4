//! Vector embeddings for document chunks and questions

use async_trait::async_trait;
use crate::error::Result;

/// Turns text into fixed-length vectors for the index store
///
/// Chunks go through `embed_batch` at upload time; questions go through
/// `embed` once per document question.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Vector for a single question
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Vectors for uploaded chunks, in input order
    ///
    /// Falls back to one `embed` call per text.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Length of every vector this provider returns; 0 when not known up front
    ///
    /// The index store rejects a rebuild whose vectors disagree with it.
    fn dimensions(&self) -> usize;

    /// Provider name for logs
    fn name(&self) -> &str;
}
