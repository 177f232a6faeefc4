//! medassist-rag: medical assistant chat and single-document Q&A
//!
//! Uploads (.txt, .md, .pdf) are extracted, split into overlapping chunks,
//! embedded and held in an in-memory similarity index. Questions about the
//! document retrieve the nearest chunks and are answered by a hosted chat
//! model, falling back to a general answer when nothing usable is found.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::CompletionGateway;
pub use ingestion::{DocumentLoader, TextChunker};
pub use providers::{CompletionProvider, EmbeddingProvider, GeminiClient, Prompt};
pub use retrieval::{ChunkRetriever, FallbackPolicy, IndexState, IndexStore, QnaOutcome};
pub use server::{state::AppState, RagServer};
pub use types::{Chunk, DocumentInfo, FileType};
