//! Document and chunk types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported upload formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// PDF document
    Pdf,
}

impl FileType {
    /// Detect file type from an upload filename
    ///
    /// Matching is an exact, case-sensitive suffix test: `notes.TXT` is
    /// not a text file.
    pub fn from_filename(filename: &str) -> Option<Self> {
        if filename.ends_with(".txt") {
            Some(Self::Txt)
        } else if filename.ends_with(".md") {
            Some(Self::Markdown)
        } else if filename.ends_with(".pdf") {
            Some(Self::Pdf)
        } else {
            None
        }
    }
}

/// A contiguous span of extracted document text
///
/// Offsets are in characters (Unicode scalar values) into the extracted
/// text, `char_end` exclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the chunk sequence
    pub index: u32,
    /// Chunk text
    pub text: String,
    /// Start offset in the extracted text
    pub char_start: usize,
    /// End offset in the extracted text
    pub char_end: usize,
}

impl Chunk {
    /// Create a chunk
    pub fn new(index: u32, text: impl Into<String>, char_start: usize, char_end: usize) -> Self {
        Self {
            index,
            text: text.into(),
            char_start,
            char_end,
        }
    }

    /// Whether the chunk carries any non-whitespace text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.char_end - self.char_start
    }
}

/// The uploaded document an index was built from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentInfo {
    /// Unique document ID
    pub id: Uuid,
    /// Original upload filename
    pub filename: String,
    /// Detected file type
    pub file_type: FileType,
    /// Upload size in bytes
    pub size_bytes: u64,
    /// Characters of extracted text
    pub extracted_chars: usize,
    /// Page count (PDF only)
    pub page_count: Option<u32>,
    /// When the document was indexed
    pub indexed_at: DateTime<Utc>,
}

impl DocumentInfo {
    /// Create document info for a fresh upload
    pub fn new(filename: impl Into<String>, file_type: FileType, size_bytes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            file_type,
            size_bytes,
            extracted_chars: 0,
            page_count: None,
            indexed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_suffix_is_case_sensitive() {
        assert_eq!(FileType::from_filename("notes.txt"), Some(FileType::Txt));
        assert_eq!(FileType::from_filename("README.md"), Some(FileType::Markdown));
        assert_eq!(FileType::from_filename("report.pdf"), Some(FileType::Pdf));
        assert_eq!(FileType::from_filename("notes.docx"), None);
        assert_eq!(FileType::from_filename("REPORT.PDF"), None);
        assert_eq!(FileType::from_filename("txt"), None);
    }

    #[test]
    fn test_blank_chunk() {
        assert!(Chunk::new(0, " \n\t", 0, 3).is_blank());
        assert!(!Chunk::new(0, " x ", 0, 3).is_blank());
    }
}
