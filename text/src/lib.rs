//! Text primitives for Quill
//!
//! This crate provides the plain-text layer the annotation engine is built on:
//! - [`TextBuffer`] - an immutable snapshot of the input text plus its [`Selection`]
//! - [`TextRange`] - half-open byte ranges
//! - [`TextChange`] - the minimal edit between two snapshots, see [`analyze`]
//!
//! All offsets are byte offsets into UTF-8 text and are kept on char boundaries.

pub mod buffer;
pub mod change;
pub mod range;

pub use buffer::{Selection, TextBuffer};
pub use change::{analyze, TextChange};
pub use range::{apply_delta, TextRange};

/// Clamp `offset` into `text` and floor it to the nearest char boundary.
pub fn clip_offset(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
