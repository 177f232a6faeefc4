//! Request body types

use serde::{Deserialize, Serialize};

/// Body of POST /chat and POST /doc-qna
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question
    pub message: String,
}
