//! Gemini client for chat completion and embeddings
//!
//! Talks to the Google Generative Language REST API with an API key.
//! Embedding requests run under the configured timeout and are retried with
//! exponential backoff on rate limits, 5xx responses and network errors.
//! Completion requests are single attempts; `CompletionGateway` owns their
//! timeout and retry budget.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::embedding::EmbeddingProvider;
use super::llm::{CompletionProvider, Prompt};
use super::retry::{with_retry, RetryPolicy};
use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};

/// Gemini API client
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    generate_model: String,
    embed_model: String,
    dimensions: usize,
    batch_size: usize,
    embedding_retry: RetryPolicy,
}

impl GeminiClient {
    /// Create a client from configuration
    pub fn new(llm: &LlmConfig, embeddings: &EmbeddingConfig) -> Result<Self> {
        let http = Client::builder()
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: llm.base_url.clone(),
            api_key: llm.api_key.clone(),
            generate_model: strip_models_prefix(&llm.generate_model),
            embed_model: strip_models_prefix(&embeddings.model),
            dimensions: embeddings.dimensions,
            batch_size: embeddings.batch_size.max(1),
            embedding_retry: RetryPolicy::for_embeddings(embeddings, llm),
        })
    }

    /// Point the client at a different API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            model,
            method
        )
    }

    /// POST a JSON body and decode the JSON reply
    ///
    /// `make_err` picks the error variant for upstream failures; rate limits
    /// and 5xx responses come back marked transient.
    async fn post_json<B, R>(&self, url: &str, body: &B, make_err: fn(String) -> Error) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = make_err(format!("Gemini API returned {}: {}", status, body));
            return Err(if is_retryable_status(status) {
                err.into_transient()
            } else {
                err
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| make_err(format!("Failed to parse Gemini response: {}", e)))
    }

    async fn embed_chunk_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = self.endpoint(&self.embed_model, "batchEmbedContents");
        let model = format!("models/{}", self.embed_model);
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: model.clone(),
                    content: Content::text(None, text.clone()),
                    task_type: "RETRIEVAL_DOCUMENT",
                })
                .collect(),
        };

        let response: BatchEmbedResponse = with_retry(&self.embedding_retry, "embedding", || {
            self.post_json(&url, &request, |m| Error::embedding(m))
        })
        .await
        .map_err(into_embedding_error)?;

        if response.embeddings.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }

        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }
}

fn strip_models_prefix(model: &str) -> String {
    let model = model.trim();
    model.strip_prefix("models/").unwrap_or(model).to_string()
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Fold transport errors into the operation's variant, keeping them
/// recognisable as transient
fn into_completion_error(err: Error) -> Error {
    match err {
        Error::Completion { .. } | Error::Timeout { .. } => err,
        other => Error::Completion {
            transient: other.is_transient(),
            message: other.to_string(),
        },
    }
}

fn into_embedding_error(err: Error) -> Error {
    match err {
        Error::Embedding { .. } | Error::Timeout { .. } => err,
        other => Error::Embedding {
            transient: other.is_transient(),
            message: other.to_string(),
        },
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&'static str>, text: String) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    model: String,
    content: Content,
    task_type: &'static str,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let url = self.endpoint(&self.generate_model, "generateContent");
        let request = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), prompt.user.clone())],
            system_instruction: Content::text(None, prompt.system.clone()),
            generation_config: GenerationConfig {
                temperature: prompt.temperature,
            },
        };

        let response: GenerateContentResponse = self
            .post_json(&url, &request, |m| Error::completion(m))
            .await
            .map_err(into_completion_error)?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::completion("No text in Gemini response"));
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.generate_model
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.endpoint(&self.embed_model, "embedContent");
        let request = EmbedContentRequest {
            model: format!("models/{}", self.embed_model),
            content: Content::text(None, text.to_string()),
            task_type: "RETRIEVAL_QUERY",
        };

        let response: EmbedContentResponse = with_retry(&self.embedding_retry, "embedding", || {
            self.post_json(&url, &request, |m| Error::embedding(m))
        })
        .await
        .map_err(into_embedding_error)?;

        Ok(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            all_embeddings.extend(self.embed_chunk_batch(batch).await?);
        }

        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
