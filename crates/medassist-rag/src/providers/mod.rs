//! Provider abstractions for the hosted embedding and chat models

pub mod embedding;
pub mod gemini;
pub mod llm;
pub mod retry;

pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use llm::{CompletionProvider, Prompt};
pub use retry::{with_retry, RetryPolicy};
