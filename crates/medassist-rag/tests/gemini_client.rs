use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use medassist_rag::config::{EmbeddingConfig, LlmConfig};
use medassist_rag::providers::{CompletionProvider, EmbeddingProvider, GeminiClient, Prompt, RetryPolicy};
use medassist_rag::{CompletionGateway, Error};

fn client(server: &MockServer, batch_size: usize) -> GeminiClient {
    let llm = LlmConfig {
        api_key: "test-key".to_string(),
        max_retries: 2,
        retry_base_delay_ms: 1,
        ..LlmConfig::default()
    };
    let embeddings = EmbeddingConfig {
        batch_size,
        dimensions: 3,
        ..EmbeddingConfig::default()
    };
    GeminiClient::new(&llm, &embeddings)
        .unwrap()
        .with_base_url(server.uri())
}

fn reply_body(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}

/// Answers batchEmbedContents with one vector per request entry
struct BatchEmbedResponder;

impl Respond for BatchEmbedResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let count = body["requests"].as_array().map(Vec::len).unwrap_or(0);
        let embeddings: Vec<Value> = (0..count).map(|i| json!({ "values": [i as f32, 1.0, 0.0] })).collect();
        ResponseTemplate::new(200).set_body_json(json!({ "embeddings": embeddings }))
    }
}

#[tokio::test]
async fn complete_sends_system_instruction_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "be a medic" }] },
            "contents": [{ "role": "user", "parts": [{ "text": "Question: flu?" }] }],
            "generationConfig": { "temperature": 0.0 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("**Symptoms**\n- fever")))
        .expect(1)
        .mount(&server)
        .await;

    let prompt = Prompt {
        system: "be a medic".to_string(),
        user: "Question: flu?".to_string(),
        temperature: 0.0,
    };
    let reply = client(&server, 100).complete(&prompt).await.unwrap();

    assert_eq!(reply, "**Symptoms**\n- fever");
}

#[tokio::test]
async fn complete_without_candidates_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let prompt = Prompt {
        system: String::new(),
        user: "hi".to_string(),
        temperature: 0.0,
    };
    let result = client(&server, 100).complete(&prompt).await;

    assert!(matches!(result, Err(Error::Completion { .. })));
}

#[tokio::test]
async fn gateway_retries_rate_limited_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("ok")))
        .mount(&server)
        .await;

    let gateway = CompletionGateway::new(Arc::new(client(&server, 100)), &LlmConfig::default())
        .with_retry_policy(RetryPolicy::new(Duration::from_secs(5), 2, Duration::from_millis(1)));

    assert_eq!(gateway.complete("flu?", None).await.unwrap(), "ok");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn embed_uses_query_task_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/embedding-001:embedContent"))
        .and(body_partial_json(json!({
            "model": "models/embedding-001",
            "taskType": "RETRIEVAL_QUERY"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embedding": { "values": [0.1, 0.2, 0.3] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedding = client(&server, 100).embed("asthma triggers").await.unwrap();

    assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn embed_batch_splits_into_batches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/embedding-001:batchEmbedContents"))
        .respond_with(BatchEmbedResponder)
        .expect(2)
        .mount(&server)
        .await;

    let texts: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
    let embeddings = client(&server, 2).embed_batch(&texts).await.unwrap();

    assert_eq!(embeddings.len(), 3);
    assert_eq!(embeddings[2], vec![0.0, 1.0, 0.0]);
}

#[tokio::test]
async fn embed_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/embedding-001:batchEmbedContents"))
        .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, 100).embed_batch(&["a".to_string()]).await;

    match result {
        Err(Error::Embedding { message, transient }) => {
            assert!(message.contains("API key not valid"));
            assert!(!transient);
        }
        other => panic!("expected embedding error, got {:?}", other),
    }
}

#[tokio::test]
async fn embed_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/embedding-001:batchEmbedContents"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let result = client(&server, 100).embed_batch(&["a".to_string()]).await;

    assert!(matches!(result, Err(Error::Embedding { .. })));
}
