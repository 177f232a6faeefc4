//! HTTP routes

pub mod chat;
pub mod qna;
pub mod status;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat::chat))
        // Uploads get the larger body limit
        .route(
            "/upload-doc",
            post(upload::upload_doc).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/doc-qna", post(qna::doc_qna))
        .route("/index-status", get(status::index_status))
}
