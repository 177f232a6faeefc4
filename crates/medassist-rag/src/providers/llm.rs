//! Completion provider trait for the hosted chat model

use async_trait::async_trait;
use crate::error::Result;

/// A single-turn chat prompt
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    /// System instruction
    pub system: String,
    /// User turn
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
}

/// Trait for chat completion
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (gemini-2.5-flash)
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete a prompt, returning the model's text verbatim
    async fn complete(&self, prompt: &Prompt) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
