//! Document ingestion: text extraction and chunking

mod chunker;
mod loader;

pub use chunker::TextChunker;
pub use loader::{DocumentLoader, ExtractedText, StagedUpload};
