//! Image encoding: `DynamicImage` → base64 PNG string.
//!
//! PNG keeps the thumbnail lossless; firmware UIs (Klipper/Moonraker, most
//! touch screens) decode the payload straight back into a PNG.

use crate::error::ThumbnailError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode an image as PNG and return the standard-alphabet base64 text.
pub fn encode_png_base64(img: &DynamicImage) -> Result<String, ThumbnailError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|source| ThumbnailError::EncodeFailure { source })?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded thumbnail: {} PNG bytes → {} base64 chars", buf.len(), b64.len());

    Ok(b64)
}
