#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use medassist_rag::providers::{CompletionProvider, EmbeddingProvider, Prompt};
use medassist_rag::{Error, Result};

pub const VOCAB: [&str; 6] = ["fever", "insulin", "fracture", "rash", "asthma", "dose"];

/// Bag-of-words embedder over a small medical vocabulary
#[derive(Default)]
pub struct KeywordEmbedder {
    pub fail: AtomicBool,
    pub batch_calls: AtomicUsize,
    pub query_calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut v: Vec<f32> = VOCAB.iter().map(|w| lower.matches(w).count() as f32).collect();
        v.push(0.01);
        v
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::embedding("quota exceeded"));
        }
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        VOCAB.len() + 1
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Records every prompt and answers with a canned reply
#[derive(Default)]
pub struct RecordingLlm {
    pub prompts: Mutex<Vec<Prompt>>,
    pub fail: AtomicBool,
    pub reply: Mutex<Option<String>>,
}

impl RecordingLlm {
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl CompletionProvider for RecordingLlm {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        self.prompts.lock().push(prompt.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::completion("Gemini API returned 400 Bad Request: invalid argument"));
        }
        let canned = self.reply.lock().clone();
        Ok(canned.unwrap_or_else(|| format!("- **Answer**: {}", prompt.user)))
    }

    fn name(&self) -> &str {
        "recording"
    }

    fn model(&self) -> &str {
        "recording-model"
    }
}
