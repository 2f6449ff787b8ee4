//! Processing entry points: settings + G-code in, G-code out.
//!
//! [`process`] is the step itself. It never fails: whatever goes wrong, the
//! caller gets back a document equal to its input plus an [`Outcome`] that
//! says why. [`try_process`] is the same pipeline with the failure exposed
//! as an `Err`, and [`process_file`] drives it over files on disk.

use crate::config::ThumbnailSettings;
use crate::error::ThumbnailError;
use crate::output::{InsertionReport, Outcome, ProcessOutput};
use crate::pipeline::{encode, extract, format::CommentBlock, insert, load};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn, Level};

/// Embed the configured thumbnail into `document`.
///
/// `document` is the slicer's ordered list of layer blocks. Only the block
/// holding the first marker line differs in the output.
///
/// # Example
/// ```rust
/// use gcode_thumbnail::{process, Outcome, ThumbnailSettings};
///
/// let gcode = vec![";FLAVOR:Marlin\n;LAYER_COUNT:12\n".to_string()];
/// let output = process(&gcode, &ThumbnailSettings::default());
///
/// // No image configured: the document comes back untouched.
/// assert!(matches!(output.outcome, Outcome::Disabled));
/// assert_eq!(output.document, gcode);
/// ```
pub fn process(document: &[String], settings: &ThumbnailSettings) -> ProcessOutput {
    match try_process(document, settings) {
        Ok((document, report)) => {
            info!(
                "Custom thumbnail '{}' inserted ({}x{}, {} chars)",
                report.image_name, report.width, report.height, report.encoded_len
            );
            ProcessOutput {
                document,
                outcome: Outcome::Inserted(report),
            }
        }
        Err(err) => {
            if err.severity() == Level::INFO {
                info!("{err}");
            } else {
                warn!("{err}");
            }
            ProcessOutput {
                document: document.to_vec(),
                outcome: if matches!(err, ThumbnailError::Disabled) {
                    Outcome::Disabled
                } else {
                    Outcome::Skipped(err)
                },
            }
        }
    }
}

/// The fallible core of [`process`].
///
/// # Errors
/// [`ThumbnailError::Disabled`] when no image path is set, and any stage
/// error otherwise. The input document is never modified.
pub fn try_process(
    document: &[String],
    settings: &ThumbnailSettings,
) -> Result<(Vec<String>, InsertionReport), ThumbnailError> {
    if !settings.is_enabled() {
        return Err(ThumbnailError::Disabled);
    }
    settings.validate()?;

    let image_path = Path::new(&settings.image_path);

    // ── Step 1: Load and scale ───────────────────────────────────────────
    let scaled = load::load_image(image_path, settings.target_width, settings.target_height)?;

    // ── Step 2: Encode ───────────────────────────────────────────────────
    let encoded = encode::encode_png_base64(&scaled.image)?;

    // ── Step 3: Format ───────────────────────────────────────────────────
    let block = CommentBlock::new(&encoded, scaled.width, scaled.height, settings.chunk_size);

    // ── Step 4: Drop old thumbnails ──────────────────────────────────────
    let mut replaced_blocks = 0;
    let stripped: Vec<String>;
    let source: &[String] = if settings.replace_existing {
        stripped = document
            .iter()
            .map(|layer| {
                let (text, n) = extract::strip_thumbnail_blocks(layer);
                replaced_blocks += n;
                text
            })
            .collect();
        if replaced_blocks > 0 {
            debug!("Removed {} existing thumbnail block(s)", replaced_blocks);
        }
        &stripped
    } else {
        document
    };

    // ── Step 5: Insert ───────────────────────────────────────────────────
    let (output, point) = insert::insert_block(source, block.lines(), &settings.marker)?;

    let report = InsertionReport {
        image_name: image_name(image_path),
        width: block.width(),
        height: block.height(),
        encoded_len: block.encoded_len(),
        body_lines: block.body_lines().len(),
        layer: point.layer,
        line: point.line,
        replaced_blocks,
    };

    Ok((output, report))
}

/// Run [`process`] over a whole G-code string treated as one layer block.
pub fn process_text(gcode: &str, settings: &ThumbnailSettings) -> (String, Outcome) {
    let ProcessOutput { document, outcome } = process(&[gcode.to_string()], settings);
    (document.concat(), outcome)
}

/// Read `input`, embed the thumbnail, and write the result to `output`.
///
/// Pipeline failures still produce an output file (a copy of the input);
/// only reading or writing the G-code files is an error. `input` and
/// `output` may be the same path.
pub fn process_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    settings: &ThumbnailSettings,
) -> Result<Outcome, ThumbnailError> {
    let input = input.as_ref();
    let gcode = std::fs::read_to_string(input).map_err(|source| ThumbnailError::InputReadFailed {
        path: input.to_path_buf(),
        source,
    })?;

    let (result, outcome) = process_text(&gcode, settings);
    write_atomic(output.as_ref(), &result)?;

    Ok(outcome)
}

/// Write via a temp file in the target directory, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), ThumbnailError> {
    let write_err = |source| ThumbnailError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn image_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
