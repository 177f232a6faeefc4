//! Text extraction from uploaded documents

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::time::timeout;

use crate::config::IngestionConfig;
use crate::error::{Error, Result};
use crate::types::FileType;

/// Plain text extracted from an upload
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// Detected file type
    pub file_type: FileType,
    /// Extracted text
    pub text: String,
    /// Total pages (PDF only)
    pub page_count: Option<u32>,
}

/// Upload bytes staged on disk for the duration of extraction
///
/// The file is removed when the guard is dropped, whichever way extraction
/// ends.
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    /// Write `data` to a new temporary file, in `dir` if given
    pub fn write(dir: Option<&Path>, file_type: FileType, data: &[u8]) -> Result<Self> {
        use std::io::Write;

        let suffix = match file_type {
            FileType::Txt => ".txt",
            FileType::Markdown => ".md",
            FileType::Pdf => ".pdf",
        };
        let mut builder = tempfile::Builder::new();
        builder.prefix("medassist-upload-").suffix(suffix);
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(data)?;
        file.flush()?;

        Ok(Self { file })
    }

    /// Path of the staged file
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Extracts text from .txt, .md and .pdf uploads
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    /// Upper bound for PDF parsing
    extraction_timeout: Duration,
    /// Directory for staged uploads (system temp dir when unset)
    staging_dir: Option<PathBuf>,
}

impl DocumentLoader {
    /// Create a loader
    pub fn new(extraction_timeout: Duration) -> Self {
        Self {
            extraction_timeout,
            staging_dir: None,
        }
    }

    /// Create from configuration
    pub fn from_config(config: &IngestionConfig) -> Self {
        Self::new(Duration::from_secs(config.extraction_timeout_secs))
    }

    /// Stage uploads in `dir` instead of the system temp dir
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Extract plain text from an upload
    ///
    /// Only the filename suffix is validated; there are no size limits
    /// or content sniffing.
    pub async fn extract(&self, filename: &str, data: &[u8]) -> Result<ExtractedText> {
        let file_type = FileType::from_filename(filename)
            .ok_or_else(|| Error::UnsupportedFormat(filename.to_string()))?;

        let staged = StagedUpload::write(self.staging_dir.as_deref(), file_type, data)?;
        tracing::debug!("Staged {} at {}", filename, staged.path().display());

        match file_type {
            FileType::Txt | FileType::Markdown => {
                let bytes = tokio::fs::read(staged.path()).await?;
                let text = String::from_utf8(bytes).map_err(|e| {
                    Error::extraction(filename, format!("content is not valid UTF-8: {}", e))
                })?;
                Ok(ExtractedText {
                    file_type,
                    text,
                    page_count: None,
                })
            }
            FileType::Pdf => self.extract_pdf(filename, staged).await,
        }
    }

    /// Parse a staged PDF on the blocking pool under the extraction timeout
    async fn extract_pdf(&self, filename: &str, staged: StagedUpload) -> Result<ExtractedText> {
        let name = filename.to_string();
        // The guard moves into the task so the file outlives a timed-out parse
        let handle = tokio::task::spawn_blocking(move || {
            let result = extract_pdf_pages(&name, staged.path());
            drop(staged);
            result
        });

        let (text, page_count) = match timeout(self.extraction_timeout, handle).await {
            Ok(Ok(result)) => result?,
            Ok(Err(e)) => {
                // pdf parsers panic on some malformed inputs
                return Err(Error::extraction(
                    filename,
                    format!("PDF parser aborted: {}", e),
                ));
            }
            Err(_) => {
                tracing::error!(
                    "PDF extraction of '{}' exceeded {}s",
                    filename,
                    self.extraction_timeout.as_secs()
                );
                return Err(Error::timeout(
                    "PDF text extraction",
                    self.extraction_timeout.as_secs(),
                ));
            }
        };

        tracing::info!(
            "Extracted {} chars from {} ({} pages)",
            text.chars().count(),
            filename,
            page_count.map_or_else(|| "?".to_string(), |p| p.to_string())
        );

        Ok(ExtractedText {
            file_type: FileType::Pdf,
            text,
            page_count,
        })
    }
}

/// Extract PDF text page by page, joining non-blank pages with a space
///
/// Falls back to whole-document extraction with pdf-extract when lopdf
/// cannot load the file.
fn extract_pdf_pages(filename: &str, path: &Path) -> Result<(String, Option<u32>)> {
    let doc = match lopdf::Document::load(path) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("lopdf failed to load {}: {}, trying pdf-extract", filename, e);
            let text = pdf_extract::extract_text(path).map_err(|e2| {
                Error::extraction(filename, format!("{}; fallback also failed: {}", e, e2))
            })?;
            return Ok((clean_pdf_text(&text), None));
        }
    };

    let pages = doc.get_pages();
    let page_count = pages.len() as u32;
    let mut page_texts = Vec::with_capacity(pages.len());

    for &page_number in pages.keys() {
        match doc.extract_text(&[page_number]) {
            Ok(text) => {
                let text = clean_pdf_text(&text);
                let text = text.trim();
                if text.is_empty() {
                    tracing::debug!("Page {} of {} has no text, skipping", page_number, filename);
                } else {
                    page_texts.push(text.to_string());
                }
            }
            Err(e) => {
                tracing::debug!("Could not extract page {} of {}: {}", page_number, filename, e);
            }
        }
    }

    Ok((page_texts.join(" "), Some(page_count)))
}

fn clean_pdf_text(text: &str) -> String {
    text.replace('\0', "")
}
