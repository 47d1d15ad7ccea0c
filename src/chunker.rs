/*!
 * Chapter text segmentation.
 *
 * Splits chapter text into ordered, size-bounded chunks suitable for a
 * context-limited generation service. Packing is hierarchical and greedy:
 * paragraphs first, then sentences, then whitespace tokens when a unit is
 * too large to fit. The same input always produces the same chunk list.
 */

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::app_config::ChunkingConfig;

/// Paragraph separator used when joining packed paragraphs
const PARAGRAPH_SEP: &str = "\n\n";

/// Blank-line boundary between paragraphs
static PARAGRAPH_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph boundary regex"));

/// Sentence terminator followed by whitespace
static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("sentence boundary regex"));

/// One bounded-size unit of source text, immutable once created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Deterministic identifier: `{chapter}_part_{NN}`
    pub id: String,

    /// Chapter this chunk belongs to
    pub chapter: String,

    /// Position of the chunk within the chapter set (reading order)
    pub order: usize,

    /// Exact source text of the chunk
    pub content: String,

    /// Character count of the content
    pub size: usize,
}

/// Chunk metadata as recorded in the chunk index file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkIndexEntry {
    /// Chunk file name, `{id}.txt`
    pub file: String,

    /// Chapter the chunk was cut from
    pub chapter: String,

    /// Character count of the chunk content
    pub size: usize,
}

/// Chunking settings the index was produced with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSettings {
    pub max_chunk_size: usize,
    pub min_chunk_size: usize,
}

/// Aggregate statistics over the whole chunk set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkStats {
    pub total_chunks: usize,
    pub total_chars: usize,
    pub average_size: f64,
}

/// Ordered list of chunk metadata plus settings and aggregate statistics.
///
/// Created once per chapter set and read-only afterward; consumed by the
/// translation run and by downstream build collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkIndex {
    pub chunks: Vec<ChunkIndexEntry>,
    pub settings: ChunkSettings,
    pub stats: ChunkStats,
}

impl ChunkIndex {
    /// Build an index over an ordered chunk list
    pub fn build(chunks: &[Chunk], settings: ChunkSettings) -> Self {
        let total_chars: usize = chunks.iter().map(|c| c.size).sum();
        let total_chunks = chunks.len();
        let average_size = if total_chunks > 0 {
            total_chars as f64 / total_chunks as f64
        } else {
            0.0
        };

        Self {
            chunks: chunks
                .iter()
                .map(|c| ChunkIndexEntry {
                    file: format!("{}.txt", c.id),
                    chapter: c.chapter.clone(),
                    size: c.size,
                })
                .collect(),
            settings,
            stats: ChunkStats {
                total_chunks,
                total_chars,
                average_size,
            },
        }
    }

    /// Load an index from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow!("Failed to read chunk index {:?}: {}", path.as_ref(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse chunk index {:?}: {}", path.as_ref(), e))
    }

    /// Chunk id for an index entry (file name without extension)
    pub fn chunk_id(entry: &ChunkIndexEntry) -> &str {
        entry.file.strip_suffix(".txt").unwrap_or(&entry.file)
    }
}

/// Splits chapter text into chunks within `[min_chunk_size, max_chunk_size]`.
///
/// A chunk may exceed the maximum only when a single sentence or token is
/// itself too large to split further; a chunk may fall below the minimum
/// only when it is the sole chunk for its input.
#[derive(Debug, Clone)]
pub struct TextChunker {
    max_chunk_size: usize,
    min_chunk_size: usize,
}

impl TextChunker {
    /// Create a chunker with explicit bounds
    pub fn new(max_chunk_size: usize, min_chunk_size: usize) -> Result<Self> {
        if max_chunk_size == 0 || min_chunk_size == 0 {
            return Err(anyhow!("Chunk sizes must be positive"));
        }
        if min_chunk_size > max_chunk_size {
            return Err(anyhow!(
                "min_chunk_size ({}) must not exceed max_chunk_size ({})",
                min_chunk_size,
                max_chunk_size
            ));
        }
        Ok(Self {
            max_chunk_size,
            min_chunk_size,
        })
    }

    /// Create a chunker from the application chunking configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.max_chunk_size, config.min_chunk_size)
    }

    /// Split `text` into ordered chunks named `{chapter}_part_{NN}`.
    ///
    /// Empty or whitespace-only input yields an empty list. Input shorter
    /// than the minimum yields a single chunk containing the trimmed text.
    pub fn chunk_text(&self, text: &str, chapter: &str) -> Vec<Chunk> {
        let paragraphs = split_paragraphs(text);

        let mut pieces: Vec<String> = Vec::new();
        let mut buffer = String::new();

        for paragraph in paragraphs {
            if buffer.is_empty() {
                buffer = paragraph;
            } else if char_len(&buffer) + char_len(PARAGRAPH_SEP) + char_len(&paragraph)
                <= self.max_chunk_size
            {
                buffer.push_str(PARAGRAPH_SEP);
                buffer.push_str(&paragraph);
            } else if char_len(&buffer) >= self.min_chunk_size {
                pieces.push(std::mem::take(&mut buffer));
                buffer = paragraph;
            } else {
                // Undersized buffer: accept a temporary oversize rather
                // than emit a chunk below the minimum.
                buffer.push_str(PARAGRAPH_SEP);
                buffer.push_str(&paragraph);
            }

            if char_len(&buffer) > self.max_chunk_size {
                // Re-split the oversized buffer at sentence granularity and
                // keep the tail in the buffer so later paragraphs can still
                // pack onto it.
                let mut sub = self.pack_sentences(&buffer);
                buffer = sub.pop().unwrap_or_default();
                pieces.append(&mut sub);
            }
        }

        // Flush the remaining buffer. Content is never dropped: a trailing
        // piece below the minimum is merged into the previous chunk instead.
        if !buffer.trim().is_empty() {
            if char_len(&buffer) >= self.min_chunk_size || pieces.is_empty() {
                pieces.push(buffer);
            } else if let Some(last) = pieces.last_mut() {
                last.push_str(PARAGRAPH_SEP);
                last.push_str(buffer.trim());
            }
        }

        pieces
            .into_iter()
            .enumerate()
            .map(|(i, content)| {
                let content = content.trim().to_string();
                let size = char_len(&content);
                Chunk {
                    id: format!("{}_part_{:02}", chapter, i + 1),
                    chapter: chapter.to_string(),
                    order: i,
                    content,
                    size,
                }
            })
            .collect()
    }

    /// Greedy sentence-level packing with the same minimum-size rule as
    /// paragraph packing. Sentences that alone exceed the maximum fall back
    /// to token-level packing.
    fn pack_sentences(&self, text: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut buffer = String::new();

        for sentence in split_sentences(text) {
            if buffer.is_empty() {
                buffer = sentence;
            } else if char_len(&buffer) + 1 + char_len(&sentence) <= self.max_chunk_size {
                buffer.push(' ');
                buffer.push_str(&sentence);
            } else if char_len(&buffer) >= self.min_chunk_size {
                out.push(std::mem::take(&mut buffer));
                buffer = sentence;
            } else {
                buffer.push(' ');
                buffer.push_str(&sentence);
            }

            if char_len(&buffer) > self.max_chunk_size {
                let mut sub = self.pack_words(&buffer);
                buffer = sub.pop().unwrap_or_default();
                out.append(&mut sub);
            }
        }

        if !buffer.trim().is_empty() {
            if char_len(&buffer) >= self.min_chunk_size || out.is_empty() {
                out.push(buffer);
            } else if let Some(last) = out.last_mut() {
                last.push(' ');
                last.push_str(buffer.trim());
            }
        }

        out
    }

    /// Last-resort token-level packing. Always produces pieces within the
    /// maximum, except for a single token that alone exceeds it, which is
    /// emitted as its own oversized piece.
    fn pack_words(&self, text: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut buffer = String::new();

        for word in text.split_whitespace() {
            if buffer.is_empty() {
                buffer = word.to_string();
            } else if char_len(&buffer) + 1 + char_len(word) <= self.max_chunk_size {
                buffer.push(' ');
                buffer.push_str(word);
            } else {
                out.push(std::mem::take(&mut buffer));
                buffer = word.to_string();
            }
        }

        if !buffer.is_empty() {
            out.push(buffer);
        }

        out
    }
}

/// Split text on blank-line boundaries into trimmed, non-empty paragraphs
fn split_paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BOUNDARY
        .split(text.trim())
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| p.to_string())
        .collect()
}

/// Split text on sentence terminators (`.`, `!`, `?` followed by
/// whitespace), keeping the terminator with its sentence
fn split_sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // The terminator is a single ASCII byte at the start of the match.
        let sentence_end = boundary.start() + 1;
        let sentence = text[start..sentence_end].trim();
        if !sentence.is_empty() {
            out.push(sentence.to_string());
        }
        start = boundary.end();
    }

    if start < text.len() {
        let tail = text[start..].trim();
        if !tail.is_empty() {
            out.push(tail.to_string());
        }
    }

    out
}

/// Character count, not byte count; sizes must match what the generation
/// service sees for multi-byte scripts
fn char_len(text: &str) -> usize {
    text.chars().count()
}
