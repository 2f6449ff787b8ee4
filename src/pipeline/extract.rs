//! Extraction: read an embedded thumbnail block back out of G-code text.
//!
//! This is the consumer side of [`super::format`]: it recognises the same
//! `; thumbnail begin WxH LEN` … `; thumbnail end` framing that firmware
//! UIs parse, checks the announced payload length, and base64-decodes the
//! PNG bytes. [`strip_thumbnail_blocks`] removes such blocks so a rerun
//! can replace a thumbnail rather than stack a second one.

use crate::error::ThumbnailError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_BEGIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^;\s*thumbnail begin (\d+)x(\d+) (\d+)\s*$").unwrap());

static RE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"^;\s*thumbnail end\s*$").unwrap());

/// A thumbnail recovered from G-code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedThumbnail {
    pub width: u32,
    pub height: u32,
    /// Raw PNG bytes.
    pub png: Vec<u8>,
}

impl ExtractedThumbnail {
    /// Decode the PNG bytes.
    pub fn decode(&self) -> Result<DynamicImage, ThumbnailError> {
        image::load_from_memory_with_format(&self.png, image::ImageFormat::Png).map_err(|e| {
            ThumbnailError::MalformedThumbnail {
                reason: format!("payload is not a PNG: {e}"),
            }
        })
    }
}

/// Extract the first thumbnail block found in `text`.
///
/// # Errors
/// - [`ThumbnailError::ThumbnailNotFound`] when no header line exists
/// - [`ThumbnailError::MalformedThumbnail`] when the block is unterminated,
///   its payload length disagrees with the header, or it is not base64
pub fn extract_thumbnail(text: &str) -> Result<ExtractedThumbnail, ThumbnailError> {
    let mut lines = text.lines();

    let (width, height, expected_len) = lines
        .by_ref()
        .find_map(parse_header)
        .ok_or(ThumbnailError::ThumbnailNotFound)?;

    let mut payload = String::with_capacity(expected_len);
    let mut terminated = false;
    for line in lines.by_ref() {
        if RE_END.is_match(line) {
            terminated = true;
            break;
        }
        let chunk = line
            .strip_prefix(';')
            .map(str::trim)
            .ok_or_else(|| ThumbnailError::MalformedThumbnail {
                reason: format!("non-comment line inside block: {line:?}"),
            })?;
        payload.push_str(chunk);
    }

    if !terminated {
        return Err(ThumbnailError::MalformedThumbnail {
            reason: "missing 'thumbnail end'".into(),
        });
    }
    if payload.len() != expected_len {
        return Err(ThumbnailError::MalformedThumbnail {
            reason: format!(
                "header announces {expected_len} chars, block holds {}",
                payload.len()
            ),
        });
    }

    let png = STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| ThumbnailError::MalformedThumbnail {
            reason: format!("invalid base64: {e}"),
        })?;

    Ok(ExtractedThumbnail { width, height, png })
}

fn parse_header(line: &str) -> Option<(u32, u32, usize)> {
    let caps = RE_BEGIN.captures(line.trim_end())?;
    Some((
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

/// Remove every complete thumbnail block from a layer's text.
///
/// A bare `;` line directly before the header and directly after the end
/// marker is removed with the block. A header is only matched with an end
/// marker reached through comment lines; if a non-comment line or another
/// header comes first, the block is unterminated and kept as-is. Returns
/// the new text and the number of blocks removed.
pub fn strip_thumbnail_blocks(layer: &str) -> (String, usize) {
    let lines: Vec<&str> = layer.split('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut removed = 0;
    let mut i = 0;

    while i < lines.len() {
        if parse_header(lines[i]).is_some() {
            if let Some(end) = find_block_end(&lines, i + 1) {
                if kept.last().is_some_and(|l| is_bare_comment(l)) {
                    kept.pop();
                }
                i = end + 1;
                if lines.get(i).is_some_and(|l| is_bare_comment(l)) {
                    i += 1;
                }
                removed += 1;
                continue;
            }
        }
        kept.push(lines[i]);
        i += 1;
    }

    (kept.join("\n"), removed)
}

/// Index of the end marker closing a block whose body starts at `from`.
fn find_block_end(lines: &[&str], from: usize) -> Option<usize> {
    for (idx, line) in lines.iter().enumerate().skip(from) {
        let line = line.trim_end();
        if RE_END.is_match(line) {
            return Some(idx);
        }
        if !line.starts_with(';') || parse_header(line).is_some() {
            return None;
        }
    }
    None
}

fn is_bare_comment(line: &str) -> bool {
    line.trim_end() == ";"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::format::CommentBlock;

    fn gcode_with(block: &CommentBlock) -> String {
        let mut text = String::from(";FLAVOR:Marlin\n;LAYER_COUNT:2\n");
        text.push_str(&block.lines().join("\n"));
        text.push_str("\nG28\n");
        text
    }

    #[test]
    fn extracts_formatted_block() {
        let encoded = STANDARD.encode(b"not really a png but bytes all the same, long enough to wrap lines");
        let block = CommentBlock::new(&encoded, 64, 32, 20);
        let thumb = extract_thumbnail(&gcode_with(&block)).unwrap();
        assert_eq!((thumb.width, thumb.height), (64, 32));
        assert_eq!(
            thumb.png,
            b"not really a png but bytes all the same, long enough to wrap lines"
        );
    }

    #[test]
    fn missing_header_is_not_found() {
        let err = extract_thumbnail(";LAYER_COUNT:2\nG28\n").unwrap_err();
        assert!(matches!(err, ThumbnailError::ThumbnailNotFound));
    }

    #[test]
    fn unterminated_block_is_malformed() {
        let err = extract_thumbnail("; thumbnail begin 1x1 4\n; QUJD\nG28\n").unwrap_err();
        assert!(matches!(err, ThumbnailError::MalformedThumbnail { .. }), "{err}");
    }

    #[test]
    fn length_mismatch_is_malformed() {
        let err =
            extract_thumbnail("; thumbnail begin 1x1 8\n; QUJD\n; thumbnail end\n").unwrap_err();
        assert!(err.to_string().contains("announces 8"), "{err}");
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let err =
            extract_thumbnail("; thumbnail begin 1x1 4\n; Q*JD\n; thumbnail end\n").unwrap_err();
        assert!(matches!(err, ThumbnailError::MalformedThumbnail { .. }));
    }

    #[test]
    fn strip_removes_framed_block() {
        let block = CommentBlock::new("QUJD", 1, 1, 78);
        let text = gcode_with(&block);
        let (stripped, n) = strip_thumbnail_blocks(&text);
        assert_eq!(n, 1);
        assert_eq!(stripped, ";FLAVOR:Marlin\n;LAYER_COUNT:2\nG28\n");
    }

    #[test]
    fn strip_removes_every_block() {
        let a = CommentBlock::new("QUJD", 1, 1, 78).lines().join("\n");
        let b = CommentBlock::new("QUJDRA==", 2, 2, 78).lines().join("\n");
        let text = format!("G28\n{a}\nG1 X1\n{b}\nM84");
        let (stripped, n) = strip_thumbnail_blocks(&text);
        assert_eq!(n, 2);
        assert_eq!(stripped, "G28\nG1 X1\nM84");
    }

    #[test]
    fn strip_keeps_unterminated_block() {
        let text = ";\n; thumbnail begin 1x1 4\n; QUJD\nG28";
        let (stripped, n) = strip_thumbnail_blocks(text);
        assert_eq!(n, 0);
        assert_eq!(stripped, text);
    }

    #[test]
    fn strip_does_not_swallow_gcode_after_unterminated_header() {
        let good = CommentBlock::new("QUJD", 1, 1, 78).lines().join("\n");
        let text = format!(
            ";\n; thumbnail begin 9x9 400\n; AAAA\nG28\nG1 X10 Y10 E5\nM104 S200\n{good}\nM84"
        );
        let (stripped, n) = strip_thumbnail_blocks(&text);
        assert_eq!(n, 1, "only the complete block is removed");
        assert_eq!(
            stripped,
            ";\n; thumbnail begin 9x9 400\n; AAAA\nG28\nG1 X10 Y10 E5\nM104 S200\nM84"
        );
    }

    #[test]
    fn strip_nested_header_leaves_outer_header() {
        let text = "; thumbnail begin 1x1 4\n; QUJD\n; thumbnail begin 1x1 4\n; QUJD\n; thumbnail end\nG28";
        let (stripped, n) = strip_thumbnail_blocks(text);
        assert_eq!(n, 1);
        assert_eq!(stripped, "; thumbnail begin 1x1 4\n; QUJD\nG28");
    }

    #[test]
    fn strip_without_blocks_is_identity() {
        let text = ";LAYER_COUNT:3\n;\nG28\n";
        assert_eq!(strip_thumbnail_blocks(text), (text.to_string(), 0));
    }
}
