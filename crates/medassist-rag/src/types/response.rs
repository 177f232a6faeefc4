//! Response body types

use serde::{Deserialize, Serialize};

use super::document::{DocumentInfo, FileType};

/// Prefix for errors rendered into a chat reply
pub const ERROR_REPLY_PREFIX: &str = "⚠️ Error:";

/// Body of a POST /chat response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply (or an error message)
    pub reply: String,
}

impl ChatResponse {
    /// Render an error as a reply
    pub fn from_error(err: &crate::Error) -> Self {
        Self {
            reply: format!("{} {}", ERROR_REPLY_PREFIX, err),
        }
    }
}

/// Which path produced a document Q&A reply
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// No document uploaded yet
    NoDocument,
    /// General answer without document context
    General,
    /// Answer grounded in retrieved chunks
    Grounded,
    /// The request failed; the reply holds the error
    Error,
}

/// Body of a POST /doc-qna response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QnaResponse {
    /// Assistant reply (or an advisory/error message)
    pub reply: String,
    /// Path that produced the reply
    pub source: ReplySource,
    /// Chunks used as context (grounded replies only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_used: Option<usize>,
}

impl QnaResponse {
    /// Render an error as a reply
    pub fn from_error(err: &crate::Error) -> Self {
        Self {
            reply: format!("{} {}", ERROR_REPLY_PREFIX, err),
            source: ReplySource::Error,
            chunks_used: None,
        }
    }
}

/// Body of a successful POST /upload-doc response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Human-readable confirmation
    pub message: String,
    /// Uploaded filename
    pub filename: String,
    /// Detected file type
    pub file_type: FileType,
    /// Chunks in the new index
    pub chunks: usize,
    /// Version of the index now active
    pub index_version: u64,
}

/// Body of a failed POST /upload-doc response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadErrorResponse {
    /// Human-readable error
    pub error: String,
    /// Machine-readable error code
    pub kind: String,
}

impl UploadErrorResponse {
    /// Build from a pipeline error
    pub fn from_error(err: &crate::Error) -> Self {
        Self {
            error: format!("{} {}", ERROR_REPLY_PREFIX, err),
            kind: err.kind().to_string(),
        }
    }
}

/// Body of GET /index-status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStatusResponse {
    /// "uninitialized", "empty" or "ready"
    pub state: String,
    /// Chunks in the active index
    pub chunks: usize,
    /// Index version (0 before the first upload)
    pub version: u64,
    /// Document the active index was built from
    pub document: Option<DocumentInfo>,
}
