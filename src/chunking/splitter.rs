//! Recursive size-based text splitter.
//!
//! Splits at the coarsest separator present in the text, recurses into pieces
//! that are still too long with finer separators, and greedily merges small
//! pieces into overlapping windows.

use std::collections::VecDeque;

/// Separators tried in order: paragraph, line, sentence, word, character.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// Deterministic recursive character splitter.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    /// Create a splitter. Sizes are measured in characters; the overlap is
    /// clamped below the chunk size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Split `text` into trimmed, non-empty chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.separators)
            .into_iter()
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut finer: &[String] = &[];

        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut small: Vec<String> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                small.push(piece);
                continue;
            }

            if !small.is_empty() {
                chunks.extend(self.merge(&small));
                small.clear();
            }

            if finer.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_with(&piece, finer));
            }
        }

        if !small.is_empty() {
            chunks.extend(self.merge(&small));
        }

        chunks
    }

    /// Greedily pack pieces into windows of at most `chunk_size` characters,
    /// carrying up to `chunk_overlap` characters into the next window.
    fn merge(&self, pieces: &[String]) -> Vec<String> {
        let mut merged = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && !window.is_empty() {
                if let Some(doc) = join_window(&window) {
                    merged.push(doc);
                }

                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    let Some(front) = window.pop_front() else {
                        break;
                    };
                    total -= char_len(front);
                }
            }

            window.push_back(piece);
            total += len;
        }

        if let Some(doc) = join_window(&window) {
            merged.push(doc);
        }

        merged
    }
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::new(1000, 100)
    }
}

/// Split on `separator`, keeping it at the start of each following piece.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut parts = text.split(separator);
    let mut pieces: Vec<String> = parts.next().map(str::to_string).into_iter().collect();
    pieces.extend(parts.map(|part| format!("{}{}", separator, part)));
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn join_window(window: &VecDeque<&str>) -> Option<String> {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = RecursiveSplitter::new(100, 10);
        assert_eq!(splitter.split("  hello world  "), vec!["hello world".to_string()]);
        assert!(splitter.split("   ").is_empty());
    }

    #[test]
    fn test_chunks_respect_size_and_overlap() {
        let text = (0..200).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ");
        let splitter = RecursiveSplitter::new(100, 20);
        let chunks = splitter.split(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "chunk too long: {}", chunk);
        }

        // Consecutive windows share trailing words.
        for pair in chunks.windows(2) {
            let last_word = pair[0].split(' ').last().unwrap();
            assert!(pair[1].contains(last_word), "no overlap between {:?}", pair);
        }

        // Every word survives splitting.
        for i in 0..200 {
            let word = format!("word{}", i);
            assert!(chunks.iter().any(|c| c.split(' ').any(|w| w == word)));
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let para = "a".repeat(30);
        let text = format!("{}\n\n{}\n\n{}", para, para, para);
        let chunks = RecursiveSplitter::new(40, 0).split(&text);
        assert_eq!(chunks, vec![para.clone(), para.clone(), para]);
    }

    #[test]
    fn test_long_token_falls_back_to_character_cuts() {
        let text = "x".repeat(250);
        let chunks = RecursiveSplitter::new(100, 10).split(&text);

        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 100));
    }

    #[test]
    fn test_split_is_deterministic() {
        let text = "One sentence here. Another one follows. ".repeat(80);
        let splitter = RecursiveSplitter::default();
        assert_eq!(splitter.split(&text), splitter.split(&text));
    }

    #[test]
    fn test_overlap_clamped_below_size() {
        let splitter = RecursiveSplitter::new(10, 50);
        assert_eq!(splitter.chunk_overlap, 9);
        // Windows advance one character at a time.
        assert_eq!(splitter.split("abcdefghijklmnopqrst").len(), 11);

        assert_eq!(RecursiveSplitter::new(0, 0).split("abc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_multibyte_lengths_counted_in_chars() {
        let text = "é".repeat(50);
        let chunks = RecursiveSplitter::new(50, 0).split(&text);
        // 100 bytes but 50 characters: fits one window.
        assert_eq!(chunks, vec![text]);
    }
}
