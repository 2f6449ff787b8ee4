//! Error types for the gcode-thumbnail library.
//!
//! Most variants are *non-fatal* for the caller: [`crate::process`] turns
//! them into [`crate::output::Outcome::Skipped`] and hands the G-code back
//! unchanged. Only the file-level helpers ([`crate::process_file`]) return
//! an `Err` to their caller, and only for I/O on the G-code files themselves.

use std::path::PathBuf;
use thiserror::Error;
use tracing::Level;

/// All errors produced by the gcode-thumbnail library.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    // ── Settings ──────────────────────────────────────────────────────────
    /// No image path is configured; the step is switched off.
    #[error("No thumbnail image configured, skipping")]
    Disabled,

    /// Builder or settings-file validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Image loading ─────────────────────────────────────────────────────
    /// The image path is empty or does not point at an existing file.
    #[error("Invalid image path or file not found: '{path}'")]
    InvalidPath { path: PathBuf },

    /// The image file exists but could not be opened or decoded.
    #[error("Failed to load image from '{path}': {source}")]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image decoded to zero pixels on one axis.
    #[error("Image '{path}' is empty ({width}x{height})")]
    EmptyImage {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    // ── Encoding ──────────────────────────────────────────────────────────
    /// PNG serialisation of the scaled image failed.
    #[error("Failed to encode thumbnail as base64 PNG: {source}")]
    EncodeFailure {
        #[source]
        source: image::ImageError,
    },

    // ── Insertion ─────────────────────────────────────────────────────────
    /// No line of the document starts with the insertion marker.
    #[error("Insertion point '{marker}' not found, thumbnail not added")]
    MarkerNotFound { marker: String },

    // ── Extraction ────────────────────────────────────────────────────────
    /// No `thumbnail begin` header in the text.
    #[error("No embedded thumbnail found")]
    ThumbnailNotFound,

    /// A thumbnail block was found but its contents are inconsistent.
    #[error("Malformed thumbnail block: {reason}")]
    MalformedThumbnail { reason: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read the input G-code file.
    #[error("Failed to read G-code file '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output G-code file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ThumbnailError {
    /// Log level at which this error is reported when the pipeline skips.
    ///
    /// A missing image path is the expected "feature off" case and is only
    /// informational; everything else needs operator attention.
    pub fn severity(&self) -> Level {
        match self {
            ThumbnailError::Disabled => Level::INFO,
            _ => Level::WARN,
        }
    }
}

/// Result alias for gcode-thumbnail operations.
pub type Result<T> = std::result::Result<T, ThumbnailError>;
