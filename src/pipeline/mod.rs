//! Pipeline stages for embedding a thumbnail into G-code.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! load ──▶ encode ──▶ format ──▶ insert
//! (path)   (PNG/b64)  (comments)  (after ;LAYER_COUNT:)
//! ```
//!
//! 1. [`load`]    — open, decode and scale the image to fit the target box
//! 2. [`encode`]  — PNG-encode and base64-wrap the scaled image
//! 3. [`format`]  — frame the payload as `; thumbnail begin/end` comments
//! 4. [`insert`]  — splice the block after the first marker line
//!
//! [`extract`] goes the other way, reading a block back out of G-code.

pub mod encode;
pub mod extract;
pub mod format;
pub mod insert;
pub mod load;
