//! Recursive text chunking with overlap
//!
//! Text is first cut into pieces no longer than the chunk size, preferring
//! paragraph breaks, then line breaks, sentence boundaries and spaces, and
//! only cutting between characters when nothing else fits. Pieces are then
//! merged greedily into chunks. Every chunk is an exact span of the input,
//! so the original text can be reassembled from the chunk sequence.

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

/// Breakpoints in priority order
#[derive(Debug, Clone, Copy)]
enum Separator {
    Paragraph,
    Line,
    Sentence,
    Word,
    Char,
}

const SEPARATORS: [Separator; 5] = [
    Separator::Paragraph,
    Separator::Line,
    Separator::Sentence,
    Separator::Word,
    Separator::Char,
];

/// An atomic span of the input
#[derive(Debug, Clone, Copy)]
struct Piece {
    byte_start: usize,
    byte_end: usize,
    char_start: usize,
    char_len: usize,
}

impl Piece {
    fn char_end(&self) -> usize {
        self.char_start + self.char_len
    }
}

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Maximum overlap between consecutive chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    ///
    /// The overlap is clamped below the chunk size so splitting always
    /// makes progress.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk size must be greater than 0".to_string()));
        }
        Ok(Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        })
    }

    /// Create from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Target chunk size in characters
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Effective overlap in characters
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split text into an ordered chunk sequence
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut pieces = Vec::new();
        self.split_pieces(text, 0, 0, 0, &mut pieces);
        self.merge(text, &pieces)
    }

    /// Rebuild the source text from a chunk sequence produced by [`chunk`](Self::chunk)
    pub fn reassemble(chunks: &[Chunk]) -> String {
        let mut text = String::new();
        let mut covered = 0usize;

        for chunk in chunks {
            let skip = covered.saturating_sub(chunk.char_start);
            text.extend(chunk.text.chars().skip(skip));
            covered = covered.max(chunk.char_end);
        }

        text
    }

    /// Recursively cut `segment` into pieces of at most `chunk_size` characters
    fn split_pieces(
        &self,
        segment: &str,
        byte_base: usize,
        char_base: usize,
        level: usize,
        out: &mut Vec<Piece>,
    ) {
        let char_len = segment.chars().count();
        if char_len <= self.chunk_size {
            out.push(Piece {
                byte_start: byte_base,
                byte_end: byte_base + segment.len(),
                char_start: char_base,
                char_len,
            });
            return;
        }

        let separator = SEPARATORS[level.min(SEPARATORS.len() - 1)];
        let parts = split_keeping_separator(segment, separator);

        // Separator absent from this segment: try the next one
        if parts.len() <= 1 {
            self.split_pieces(segment, byte_base, char_base, level + 1, out);
            return;
        }

        let mut char_offset = char_base;
        for (offset, part) in parts {
            let part_chars = part.chars().count();
            self.split_pieces(part, byte_base + offset, char_offset, level + 1, out);
            char_offset += part_chars;
        }
    }

    /// Greedily merge pieces into overlapping chunks
    fn merge(&self, text: &str, pieces: &[Piece]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < pieces.len() {
            let mut end = start;
            let mut len = 0usize;
            while end < pieces.len() && (end == start || len + pieces[end].char_len <= self.chunk_size)
            {
                len += pieces[end].char_len;
                end += 1;
            }

            let first = pieces[start];
            let last = pieces[end - 1];
            chunks.push(Chunk::new(
                chunks.len() as u32,
                &text[first.byte_start..last.byte_end],
                first.char_start,
                last.char_end(),
            ));

            if end == pieces.len() {
                break;
            }

            // Earliest piece that keeps the overlap bounded and leaves room
            // for the next unseen piece. `end` itself always qualifies.
            let chunk_end = last.char_end();
            let next_len = pieces[end].char_len;
            start = (start + 1..=end)
                .find(|&s| {
                    let carried = chunk_end - pieces[s].char_start;
                    carried <= self.overlap && carried + next_len <= self.chunk_size
                })
                .unwrap_or(end);
        }

        chunks
    }
}

/// Split `segment` at `separator`, keeping each separator attached to the
/// part before it. Returns `(byte_offset, part)` pairs covering the segment.
fn split_keeping_separator(segment: &str, separator: Separator) -> Vec<(usize, &str)> {
    let literal = match separator {
        Separator::Paragraph => "\n\n",
        Separator::Line => "\n",
        Separator::Word => " ",
        Separator::Sentence => return segment.split_sentence_bound_indices().collect(),
        Separator::Char => {
            return segment
                .char_indices()
                .map(|(i, c)| (i, &segment[i..i + c.len_utf8()]))
                .collect()
        }
    };

    let mut parts = Vec::new();
    let mut part_start = 0usize;
    for (idx, sep) in segment.match_indices(literal) {
        let part_end = idx + sep.len();
        parts.push((part_start, &segment[part_start..part_end]));
        part_start = part_end;
    }
    if part_start < segment.len() {
        parts.push((part_start, &segment[part_start..]));
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    fn sample_text(target_chars: usize) -> String {
        let sentences = [
            "Fever is a temporary increase in body temperature. ",
            "It is often a sign that the body is fighting an infection. ",
            "Adults should seek care when a fever exceeds 39.4 C. ",
            "Hydration and rest help recovery.\n",
            "Children may need different dosing of antipyretics.\n\n",
        ];
        let mut text = String::new();
        let mut i = 0;
        while text.chars().count() < target_chars {
            text.push_str(sentences[i % sentences.len()]);
            i += 1;
        }
        text.chars().take(target_chars).collect()
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(1000, 200).unwrap();
        assert!(chunker.chunk("").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunker = TextChunker::new(1000, 200).unwrap();
        let text = "Aspirin reduces fever by inhibiting prostaglandin synthesis.";
        let chunks = chunker.chunk(text);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
        assert_eq!(chunks[0].char_start, 0);
        assert_eq!(chunks[0].char_end, text.chars().count());
    }

    #[test]
    fn test_separator_priority() {
        let chunker = TextChunker::new(8, 0).unwrap();
        let text = "aa aa\n\nbb bb\n\ncc cc";
        let chunks = chunker.chunk(text);

        assert_eq!(texts(&chunks), vec!["aa aa\n\n", "bb bb\n\n", "cc cc"]);
        assert_eq!(TextChunker::reassemble(&chunks), text);
    }

    #[test]
    fn test_hard_cut_applies_overlap_windows() {
        let chunker = TextChunker::new(4, 1).unwrap();
        let chunks = chunker.chunk("abcdefghij");

        assert_eq!(texts(&chunks), vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn test_overlap_clamped_to_allow_progress() {
        let chunker = TextChunker::new(3, 9).unwrap();
        assert_eq!(chunker.overlap(), 2);
        assert_eq!(texts(&chunker.chunk("abcd")), vec!["abc", "bcd"]);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(TextChunker::new(0, 0), Err(Error::Config(_))));
    }

    #[test]
    fn test_utf8_boundaries_preserved() {
        let chunker = TextChunker::new(3, 0).unwrap();
        let text = "a🙂b🙂c🙂";
        let chunks = chunker.chunk(text);

        assert!(chunks.iter().all(|c| c.text.chars().count() <= 3));
        assert_eq!(TextChunker::reassemble(&chunks), text);
    }

    #[test]
    fn test_2500_chars_overlap_and_round_trip() {
        let chunker = TextChunker::new(1000, 200).unwrap();
        let text = sample_text(2500);
        let chunks = chunker.chunk(&text);

        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.char_len() <= 1000);
            assert_eq!(chunk.text.chars().count(), chunk.char_len());
        }
        for pair in chunks.windows(2) {
            assert!(pair[1].char_start <= pair[0].char_end, "gap between chunks");
            assert!(pair[1].char_start > pair[0].char_start);
            assert!(pair[0].char_end - pair[1].char_start <= 200);
        }
        assert_eq!(chunks.first().unwrap().char_start, 0);
        assert_eq!(chunks.last().unwrap().char_end, 2500);
        assert_eq!(TextChunker::reassemble(&chunks), text);
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let chunker = TextChunker::new(1000, 200).unwrap();
        let text = sample_text(4200);
        assert_eq!(chunker.chunk(&text), chunker.chunk(&text));
    }

    #[test]
    fn test_prefers_paragraph_breaks() {
        let chunker = TextChunker::new(1000, 200).unwrap();
        let para = "word ".repeat(150);
        let text = format!("{}\n\n{}\n\n{}", para, para, para);
        let chunks = chunker.chunk(&text);

        // Every chunk but the last ends on a paragraph break
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.text.ends_with("\n\n"), "chunk ended mid-paragraph");
        }
        assert_eq!(TextChunker::reassemble(&chunks), text);
    }
}
