//! Image loading: path → decoded, aspect-preserving scaled `DynamicImage`.
//!
//! The image is scaled to *fit* the target box: the limiting axis lands on
//! the target exactly and the other axis is smaller, so the reported size
//! may differ from the requested one. Images smaller than the box are
//! scaled up, matching what slicer UIs expect from a fixed preview size.
//! The free axis is truncated to whole pixels.

use crate::error::ThumbnailError;
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageReader};
use std::path::Path;
use tracing::debug;

/// Bilinear resampling; smooth without Lanczos ringing on flat logos.
pub const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

/// A decoded image after scaling, with its actual dimensions.
#[derive(Debug, Clone)]
pub struct ScaledImage {
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
}

/// Load `path` and scale it to fit within `target_width` × `target_height`.
///
/// # Errors
/// - [`ThumbnailError::InvalidPath`] when the path is empty or missing
/// - [`ThumbnailError::DecodeFailure`] when the file is not a readable image
/// - [`ThumbnailError::EmptyImage`] when it decodes to zero pixels
/// - [`ThumbnailError::InvalidConfig`] when a target dimension is zero
pub fn load_image(
    path: impl AsRef<Path>,
    target_width: u32,
    target_height: u32,
) -> Result<ScaledImage, ThumbnailError> {
    let path = path.as_ref();

    if path.as_os_str().is_empty() || !path.exists() {
        return Err(ThumbnailError::InvalidPath {
            path: path.to_path_buf(),
        });
    }

    let image = decode_image(path)?;
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(ThumbnailError::EmptyImage {
            path: path.to_path_buf(),
            width: src_w,
            height: src_h,
        });
    }

    let scaled = scale_to_fit(&image, target_width, target_height)?;
    debug!(
        "Loaded '{}' {}x{} → {}x{}",
        path.display(),
        src_w,
        src_h,
        scaled.width,
        scaled.height
    );
    Ok(scaled)
}

/// Decode an image file, sniffing the format from its content.
fn decode_image(path: &Path) -> Result<DynamicImage, ThumbnailError> {
    let decode_err = |source| ThumbnailError::DecodeFailure {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)
}

/// Scale `image` to fit inside the target box, keeping its aspect ratio.
pub fn scale_to_fit(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
) -> Result<ScaledImage, ThumbnailError> {
    if target_width == 0 || target_height == 0 {
        return Err(ThumbnailError::InvalidConfig(format!(
            "target size must be positive, got {}x{}",
            target_width, target_height
        )));
    }

    let (src_w, src_h) = image.dimensions();
    let (width, height) = fit_dimensions(src_w, src_h, target_width, target_height);
    let image = if (width, height) == (src_w, src_h) {
        image.clone()
    } else {
        image.resize_exact(width, height, RESAMPLE_FILTER)
    };
    Ok(ScaledImage {
        image,
        width,
        height,
    })
}

/// Largest size with the source's aspect ratio that fits the target box.
///
/// The free axis is truncated, never rounded, so a 7x3 source in a 300x300
/// box becomes 300x128. Neither axis drops below one pixel.
pub fn fit_dimensions(src_w: u32, src_h: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    let (sw, sh) = (u64::from(src_w.max(1)), u64::from(src_h.max(1)));
    let (tw, th) = (u64::from(target_w), u64::from(target_h));

    let width_at_full_height = th * sw / sh;
    let (w, h) = if width_at_full_height <= tw {
        (width_at_full_height, th)
    } else {
        (tw, tw * sh / sw)
    };
    // Both values are bounded by the u32 target.
    (w.max(1) as u32, h.max(1) as u32)
}
