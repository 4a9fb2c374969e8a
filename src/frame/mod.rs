//! Per-frame metadata extraction.
//!
//! Turns an opaque frame handle into a [`FrameRecord`] for reporting and
//! classifies anonymous closures ("block frames").

pub mod record;

// Re-export main types
pub use record::{extract, extract_into, is_block_label, FrameRecord};
