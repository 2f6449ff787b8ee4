//! Comment formatting: base64 payload → framed G-code comment lines.
//!
//! ```text
//! ;
//! ; thumbnail begin 300x150 8464
//! ; iVBORw0KGgoAAAANSUhEUgAAASwAAACWCAYAAABkW7XSAAAgAElEQVR4Xu...   (78 chars)
//! ; ...
//! ; thumbnail end
//! ;
//! ```
//!
//! This is the convention PrusaSlicer and Klipper/Moonraker use, so the
//! existing thumbnail parsers pick the block up without changes.

use crate::config::DEFAULT_CHUNK_SIZE;

/// Prefix of every payload line.
pub const COMMENT_PREFIX: &str = "; ";

pub const BEGIN_TAG: &str = "thumbnail begin";
pub const END_TAG: &str = "thumbnail end";

/// A formatted thumbnail block, ready to splice into a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    lines: Vec<String>,
    width: u32,
    height: u32,
    encoded_len: usize,
}

impl CommentBlock {
    /// Frame `encoded` into comment lines of at most `chunk_size` payload
    /// characters. A `chunk_size` of 0 is treated as 1. Lines are split on
    /// character boundaries.
    pub fn new(encoded: &str, width: u32, height: u32, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let body_count = encoded.chars().count().div_ceil(chunk_size);

        let mut lines = Vec::with_capacity(body_count + 4);
        lines.push(";".to_string());
        lines.push(format!(
            "{COMMENT_PREFIX}{BEGIN_TAG} {width}x{height} {}",
            encoded.len()
        ));
        lines.extend(
            char_chunks(encoded, chunk_size).map(|chunk| format!("{COMMENT_PREFIX}{chunk}")),
        );
        lines.push(format!("{COMMENT_PREFIX}{END_TAG}"));
        lines.push(";".to_string());

        Self {
            lines,
            width,
            height,
            encoded_len: encoded.len(),
        }
    }

    /// Frame with the default chunk size of 78.
    pub fn with_default_chunks(encoded: &str, width: u32, height: u32) -> Self {
        Self::new(encoded, width, height, DEFAULT_CHUNK_SIZE)
    }

    /// Every line of the block, opener to closer.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Payload lines only, prefix included.
    pub fn body_lines(&self) -> &[String] {
        &self.lines[2..self.lines.len() - 2]
    }

    /// Body lines stripped of their prefix and joined back together.
    pub fn payload(&self) -> String {
        self.body_lines()
            .iter()
            .map(|l| l.strip_prefix(COMMENT_PREFIX).unwrap_or(l))
            .collect()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Length of the base64 payload announced in the header.
    pub fn encoded_len(&self) -> usize {
        self.encoded_len
    }
}

/// Consecutive slices of `text` holding at most `size` characters each.
fn char_chunks(text: &str, size: usize) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let split = rest
            .char_indices()
            .nth(size)
            .map_or(rest.len(), |(idx, _)| idx);
        let (head, tail) = rest.split_at(split);
        rest = tail;
        Some(head)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_of(len: usize) -> String {
        const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
        (0..len).map(|i| ALPHABET[i % ALPHABET.len()] as char).collect()
    }

    #[test]
    fn frame_layout() {
        let block = CommentBlock::new("QUJD", 32, 16, 78);
        assert_eq!(
            block.lines(),
            &[
                ";",
                "; thumbnail begin 32x16 4",
                "; QUJD",
                "; thumbnail end",
                ";",
            ]
        );
    }

    #[test]
    fn two_hundred_chars_split_78_78_44() {
        let encoded = payload_of(200);
        let block = CommentBlock::new(&encoded, 300, 300, 78);
        let lens: Vec<usize> = block
            .body_lines()
            .iter()
            .map(|l| l.strip_prefix("; ").unwrap().len())
            .collect();
        assert_eq!(lens, vec![78, 78, 44]);
        assert_eq!(block.lines()[1], "; thumbnail begin 300x300 200");
    }

    #[test]
    fn exact_multiple_has_no_trailing_short_line() {
        let block = CommentBlock::new(&payload_of(156), 1, 1, 78);
        assert_eq!(block.body_lines().len(), 2);
    }

    #[test]
    fn chunks_concatenate_to_payload() {
        for len in [1, 77, 78, 79, 500, 1031] {
            let encoded = payload_of(len);
            for chunk in [1, 3, 64, 78, 200] {
                let block = CommentBlock::new(&encoded, 10, 10, chunk);
                assert_eq!(block.payload(), encoded, "len={len} chunk={chunk}");
                assert_eq!(block.body_lines().len(), len.div_ceil(chunk));
            }
        }
    }

    #[test]
    fn formatting_is_deterministic() {
        let encoded = payload_of(333);
        assert_eq!(
            CommentBlock::new(&encoded, 120, 90, 78),
            CommentBlock::new(&encoded, 120, 90, 78)
        );
    }

    #[test]
    fn empty_payload_has_no_body() {
        let block = CommentBlock::new("", 5, 5, 78);
        assert!(block.body_lines().is_empty());
        assert_eq!(block.lines().len(), 4);
        assert_eq!(block.lines()[1], "; thumbnail begin 5x5 0");
    }

    #[test]
    fn zero_chunk_size_treated_as_one() {
        let block = CommentBlock::new("abc", 1, 1, 0);
        assert_eq!(block.body_lines(), &["; a", "; b", "; c"]);
    }

    #[test]
    fn multibyte_payload_splits_on_char_boundaries() {
        let block = CommentBlock::new("éééé", 1, 1, 3);
        assert_eq!(block.body_lines(), &["; ééé", "; é"]);
        assert_eq!(block.payload(), "éééé");
    }
}
