//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{DocumentInfo, FileType, UploadResponse};

/// POST /upload-doc - extract, chunk, embed and index one document
///
/// The new document replaces the active index only once every stage has
/// succeeded. Failures map to a non-2xx status with `{"error", "kind"}`.
pub async fn upload_doc(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();

    let (filename, data) = read_file_field(&mut multipart).await?;
    tracing::info!("Upload: {} ({} bytes)", filename, data.len());

    // Rejected before any staging or parsing
    let file_type = FileType::from_filename(&filename)
        .ok_or_else(|| Error::UnsupportedFormat(filename.clone()))?;

    let extracted = state.loader().extract(&filename, &data).await?;
    let chunks = state.chunker().chunk(&extracted.text);

    let mut document = DocumentInfo::new(&filename, file_type, data.len() as u64);
    document.extracted_chars = extracted.text.chars().count();
    document.page_count = extracted.page_count;

    let chunk_count = chunks.len();
    let index_version = state.index().rebuild(document, chunks).await?.version;

    tracing::info!(
        "Indexed {} into {} chunks in {}ms (version {})",
        filename,
        chunk_count,
        start.elapsed().as_millis(),
        index_version
    );

    Ok(Json(UploadResponse {
        message: format!("✅ Document '{}' uploaded and indexed successfully!", filename),
        filename,
        file_type,
        chunks: chunk_count,
        index_version,
    }))
}

/// Read the `file` field, or the first field carrying a filename
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, bytes::Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::BadRequest("Upload is missing a filename".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::BadRequest(format!("Failed to read file: {}", e)))?;

        return Ok((filename, data));
    }

    Err(Error::BadRequest("No file field in upload".to_string()))
}
