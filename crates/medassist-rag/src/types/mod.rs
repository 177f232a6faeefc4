//! Core types for the service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, DocumentInfo, FileType};
pub use query::ChatRequest;
pub use response::{
    ChatResponse, IndexStatusResponse, QnaResponse, ReplySource, UploadErrorResponse,
    UploadResponse,
};
