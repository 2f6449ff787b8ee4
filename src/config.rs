//! Settings for the thumbnail step.
//!
//! All behaviour is controlled through [`ThumbnailSettings`], built via its
//! [`ThumbnailSettingsBuilder`] or deserialised from the host's JSON settings
//! dictionary with [`ThumbnailSettings::from_json_str`]. Every key is
//! optional; missing keys take the defaults documented on each field.

use crate::error::ThumbnailError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default thumbnail box edge, in pixels.
pub const DEFAULT_TARGET_SIZE: u32 = 300;

/// Default number of base64 characters per comment line.
pub const DEFAULT_CHUNK_SIZE: usize = 78;

/// Line prefix after which the thumbnail block is inserted.
pub const DEFAULT_MARKER: &str = ";LAYER_COUNT:";

/// Settings for one thumbnail run.
///
/// # Example
/// ```rust
/// use gcode_thumbnail::ThumbnailSettings;
///
/// let settings = ThumbnailSettings::builder()
///     .image_path("C:/Images/benchy.png")
///     .target_width(400)
///     .target_height(300)
///     .build()
///     .unwrap();
/// assert_eq!(settings.chunk_size, 78);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailSettings {
    /// Full path to the image. Empty disables the step. Default: empty.
    ///
    /// Forward slashes work on every platform, including Windows
    /// (`C:/Images/my_image.png`).
    pub image_path: String,

    /// Width of the box the image is scaled into, in pixels. Default: 300.
    pub target_width: u32,

    /// Height of the box the image is scaled into, in pixels. Default: 300.
    pub target_height: u32,

    /// Base64 characters per `; ` comment line. Default: 78.
    pub chunk_size: usize,

    /// Insertion marker; the block goes right after the first line starting
    /// with it. Default: `;LAYER_COUNT:`.
    pub marker: String,

    /// Remove thumbnail blocks already present in the document before
    /// inserting. Default: false.
    pub replace_existing: bool,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            target_width: DEFAULT_TARGET_SIZE,
            target_height: DEFAULT_TARGET_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            marker: DEFAULT_MARKER.to_string(),
            replace_existing: false,
        }
    }
}

impl ThumbnailSettings {
    /// Create a new builder for `ThumbnailSettings`.
    pub fn builder() -> ThumbnailSettingsBuilder {
        ThumbnailSettingsBuilder {
            settings: Self::default(),
        }
    }

    /// Parse a JSON settings dictionary, e.g.
    /// `{"image_path": "/tmp/logo.png", "target_width": 200}`.
    pub fn from_json_str(json: &str) -> Result<Self, ThumbnailError> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| ThumbnailError::InvalidConfig(format!("settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and parse a JSON settings file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ThumbnailError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ThumbnailError::InvalidConfig(format!("cannot read '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// `false` when no image path is configured.
    pub fn is_enabled(&self) -> bool {
        !self.image_path.is_empty()
    }

    /// Check the numeric and marker constraints.
    pub fn validate(&self) -> Result<(), ThumbnailError> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(ThumbnailError::InvalidConfig(format!(
                "target size must be positive, got {}x{}",
                self.target_width, self.target_height
            )));
        }
        if self.chunk_size == 0 {
            return Err(ThumbnailError::InvalidConfig(
                "chunk size must be ≥ 1".into(),
            ));
        }
        if self.marker.is_empty() {
            return Err(ThumbnailError::InvalidConfig(
                "insertion marker must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ThumbnailSettings`].
#[derive(Debug)]
pub struct ThumbnailSettingsBuilder {
    settings: ThumbnailSettings,
}

impl ThumbnailSettingsBuilder {
    pub fn image_path(mut self, path: impl Into<String>) -> Self {
        self.settings.image_path = path.into();
        self
    }

    pub fn target_width(mut self, px: u32) -> Self {
        self.settings.target_width = px;
        self
    }

    pub fn target_height(mut self, px: u32) -> Self {
        self.settings.target_height = px;
        self
    }

    pub fn chunk_size(mut self, n: usize) -> Self {
        self.settings.chunk_size = n;
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.settings.marker = marker.into();
        self
    }

    pub fn replace_existing(mut self, v: bool) -> Self {
        self.settings.replace_existing = v;
        self
    }

    /// Build the settings, validating constraints.
    pub fn build(self) -> Result<ThumbnailSettings, ThumbnailError> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_host_declaration() {
        let s = ThumbnailSettings::default();
        assert_eq!(s.image_path, "");
        assert_eq!(s.target_width, 300);
        assert_eq!(s.target_height, 300);
        assert_eq!(s.chunk_size, 78);
        assert_eq!(s.marker, ";LAYER_COUNT:");
        assert!(!s.replace_existing);
        assert!(!s.is_enabled());
    }

    #[test]
    fn builder_rejects_zero_dimensions() {
        let err = ThumbnailSettings::builder()
            .target_width(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ThumbnailError::InvalidConfig(_)));

        assert!(ThumbnailSettings::builder()
            .target_height(0)
            .build()
            .is_err());
    }

    #[test]
    fn builder_rejects_zero_chunk_and_empty_marker() {
        assert!(ThumbnailSettings::builder().chunk_size(0).build().is_err());
        assert!(ThumbnailSettings::builder().marker("").build().is_err());
    }

    #[test]
    fn json_partial_settings_use_defaults() {
        let s = ThumbnailSettings::from_json_str(r#"{"image_path": "/tmp/a.png", "target_width": 120}"#)
            .unwrap();
        assert_eq!(s.image_path, "/tmp/a.png");
        assert_eq!(s.target_width, 120);
        assert_eq!(s.target_height, 300);
        assert!(s.is_enabled());
    }

    #[test]
    fn json_invalid_values_rejected() {
        assert!(ThumbnailSettings::from_json_str(r#"{"target_width": 0}"#).is_err());
        assert!(ThumbnailSettings::from_json_str(r#"{"target_width": -5}"#).is_err());
        assert!(ThumbnailSettings::from_json_str("not json").is_err());
    }

    #[test]
    fn whitespace_path_is_not_disabled() {
        // Only a truly empty path switches the step off; "   " is a bad path.
        let s = ThumbnailSettings::builder().image_path("   ").build().unwrap();
        assert!(s.is_enabled());
    }
}
