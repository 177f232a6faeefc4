//! General medical chat

use axum::{extract::State, Json};

use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// Reply used when the model returns no text
pub const EMPTY_REPLY_NOTICE: &str = "⚠️ The assistant returned an empty reply. Please try again.";

/// POST /chat - answer from general medical knowledge
///
/// Failures are rendered into the reply; the status is always 200.
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<ChatResponse> {
    tracing::info!("Chat: \"{}\"", request.message);

    match state.gateway().complete(&request.message, None).await {
        Ok(reply) if reply.trim().is_empty() => Json(ChatResponse {
            reply: EMPTY_REPLY_NOTICE.to_string(),
        }),
        Ok(reply) => Json(ChatResponse { reply }),
        Err(e) => {
            tracing::error!("Chat failed: {}", e);
            Json(ChatResponse::from_error(&e))
        }
    }
}
