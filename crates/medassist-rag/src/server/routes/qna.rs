//! Question answering over the uploaded document

use axum::{extract::State, Json};

use super::chat::EMPTY_REPLY_NOTICE;
use crate::retrieval::QnaOutcome;
use crate::server::state::AppState;
use crate::types::{ChatRequest, QnaResponse, ReplySource};

/// POST /doc-qna - answer from the document, falling back to general knowledge
///
/// Failures are rendered into the reply; the status is always 200.
pub async fn doc_qna(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<QnaResponse> {
    tracing::info!("Document question: \"{}\"", request.message);

    let outcome = match state.policy().answer(&request.message).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Document question failed: {}", e);
            return Json(QnaResponse::from_error(&e));
        }
    };

    let (source, chunks_used) = match &outcome {
        QnaOutcome::NoDocument => (ReplySource::NoDocument, None),
        QnaOutcome::General(_) => (ReplySource::General, None),
        QnaOutcome::Grounded { chunks_used, .. } => (ReplySource::Grounded, Some(*chunks_used)),
    };

    let reply = if outcome.reply().trim().is_empty() {
        EMPTY_REPLY_NOTICE.to_string()
    } else {
        outcome.reply().to_string()
    };

    Json(QnaResponse {
        reply,
        source,
        chunks_used,
    })
}
