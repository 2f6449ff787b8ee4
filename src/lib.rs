//! # gcode-thumbnail
//!
//! Embed a custom thumbnail image into 3D-printer G-code.
//!
//! Slicers write a preview of the model into the G-code header so printer
//! UIs (Klipper/Moonraker, Mainsail, Fluidd, touch screens) can show it.
//! This crate replaces that preview with an image of your choosing: it
//! scales the image into a target box, encodes it as base64 PNG, and
//! inserts it as a `; thumbnail begin … ; thumbnail end` comment block
//! right after the `;LAYER_COUNT:` line.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image path
//!  │
//!  ├─ 1. Load    decode + aspect-preserving scale into W×H
//!  ├─ 2. Encode  PNG → base64
//!  ├─ 3. Format  `; thumbnail begin WxH LEN` + 78-char comment lines
//!  └─ 4. Insert  after the first `;LAYER_COUNT:` line, first match only
//! ```
//!
//! Every failure degrades to "return the G-code unchanged" with a logged
//! reason; nothing panics or aborts the caller's run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gcode_thumbnail::{process, ThumbnailSettings};
//!
//! let settings = ThumbnailSettings::builder()
//!     .image_path("/home/me/logo.png")
//!     .target_width(300)
//!     .target_height(300)
//!     .build()?;
//!
//! let layers: Vec<String> = vec![/* slicer output, one string per layer */];
//! let output = process(&layers, &settings);
//! println!("{:?}", output.outcome);
//! # Ok::<(), gcode_thumbnail::ThumbnailError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `gcode-thumb` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod schema;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ThumbnailSettings, ThumbnailSettingsBuilder, DEFAULT_CHUNK_SIZE, DEFAULT_MARKER};
pub use error::{Result, ThumbnailError};
pub use output::{InsertionReport, Outcome, OutcomeSummary, ProcessOutput};
pub use pipeline::extract::{extract_thumbnail, strip_thumbnail_blocks, ExtractedThumbnail};
pub use pipeline::format::CommentBlock;
pub use pipeline::insert::{find_marker, insert_block, InsertionPoint};
pub use pipeline::load::{fit_dimensions, load_image, ScaledImage};
pub use pipeline::encode::encode_png_base64;
pub use process::{process, process_file, process_text, try_process};
pub use schema::settings_schema;
