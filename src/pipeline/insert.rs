//! Insertion: splice a comment block after the first marker line.
//!
//! The scan walks layers in order, then lines in order, and stops at the
//! first line that starts with the marker. Later layers, and any further
//! marker lines, are never looked at. The input document is never mutated:
//! on success a new document is returned in which only the matched layer
//! differs; on failure the caller keeps its original.

use crate::error::ThumbnailError;
use tracing::debug;

/// Where the marker was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    /// 0-based index of the layer block.
    pub layer: usize,
    /// 0-based line index of the marker line within that layer.
    pub line: usize,
}

/// Find the first line starting with `marker`.
pub fn find_marker(document: &[String], marker: &str) -> Option<InsertionPoint> {
    document.iter().enumerate().find_map(|(layer, text)| {
        text.split('\n')
            .position(|line| line.starts_with(marker))
            .map(|line| InsertionPoint { layer, line })
    })
}

/// Insert `block` right after the first marker line.
///
/// # Errors
/// [`ThumbnailError::MarkerNotFound`] when no line of any layer starts with
/// `marker`.
pub fn insert_block(
    document: &[String],
    block: &[String],
    marker: &str,
) -> Result<(Vec<String>, InsertionPoint), ThumbnailError> {
    let point = find_marker(document, marker).ok_or_else(|| ThumbnailError::MarkerNotFound {
        marker: marker.to_string(),
    })?;

    let mut output = document.to_vec();
    output[point.layer] = splice_after(&document[point.layer], point.line, block);
    debug!(
        "Inserted {} lines after layer {} line {}",
        block.len(),
        point.layer,
        point.line
    );

    Ok((output, point))
}

/// Rebuild `layer` with `block` inserted after line index `line`.
fn splice_after(layer: &str, line: usize, block: &[String]) -> String {
    let mut lines: Vec<&str> = layer.split('\n').collect();
    let at = (line + 1).min(lines.len());
    lines.splice(at..at, block.iter().map(String::as_str));
    lines.join("\n")
}
