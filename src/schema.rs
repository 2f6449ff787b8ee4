//! Host-facing settings declaration.
//!
//! Slicer post-processing hosts render a form from this JSON and hand the
//! filled-in values back as the settings dictionary that
//! [`crate::ThumbnailSettings::from_json_str`] reads.

use crate::config::DEFAULT_TARGET_SIZE;
use serde_json::{json, Value};

/// Identifier the host registers the step under.
pub const SCRIPT_KEY: &str = "ReplaceThumbnail";

/// Settings declaration: one entry per user-facing option.
pub fn settings_schema() -> Value {
    json!({
        "name": "Custom Thumbnail (Klipper & Moonraker)",
        "key": SCRIPT_KEY,
        "metadata": {},
        "version": 2,
        "settings": {
            "image_path": {
                "label": "Image path",
                "description": "Full path to the image. Use forward slashes '/', even on Windows. Ex: C:/Images/my_image.png",
                "type": "str",
                "default_value": ""
            },
            "target_width": {
                "label": "Thumbnail width (px)",
                "description": "Target width of the thumbnail. The image keeps its proportions.",
                "type": "int",
                "default_value": DEFAULT_TARGET_SIZE
            },
            "target_height": {
                "label": "Thumbnail height (px)",
                "description": "Target height of the thumbnail. The image keeps its proportions.",
                "type": "int",
                "default_value": DEFAULT_TARGET_SIZE
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThumbnailSettings;

    #[test]
    fn declares_the_three_host_settings() {
        let schema = settings_schema();
        let settings = schema["settings"].as_object().unwrap();
        let mut keys: Vec<&str> = settings.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["image_path", "target_height", "target_width"]);
        assert_eq!(schema["key"], SCRIPT_KEY);
    }

    #[test]
    fn schema_defaults_agree_with_settings_defaults() {
        let schema = settings_schema();
        let defaults: serde_json::Map<String, Value> = schema["settings"]
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v["default_value"].clone()))
            .collect();
        let parsed =
            ThumbnailSettings::from_json_str(&Value::Object(defaults).to_string()).unwrap();
        assert_eq!(parsed, ThumbnailSettings::default());
    }
}
