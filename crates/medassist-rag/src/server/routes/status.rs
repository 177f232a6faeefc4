//! Index status endpoint

use axum::{extract::State, Json};

use crate::server::state::AppState;
use crate::types::IndexStatusResponse;

/// GET /index-status - state of the active index
pub async fn index_status(State(state): State<AppState>) -> Json<IndexStatusResponse> {
    let status = state.index().status();

    Json(IndexStatusResponse {
        state: status.state.as_str().to_string(),
        chunks: status.state.chunk_count(),
        version: status.version,
        document: status.document,
    })
}
