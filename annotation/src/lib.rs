//! Annotation tracking for Quill.
//!
//! Annotations are reference spans over a plain-text buffer. After every edit
//! the set goes through two passes:
//!
//! 1. [`update`] remaps each annotation through the [`TextChange`](quill_text::TextChange),
//!    splitting the set into survivors and destroyed annotations
//! 2. [`sanitize`] drops anything that no longer matches the text and resolves
//!    overlaps
//!
//! Both passes return new collections; the caller's set is never mutated.

pub mod annotation;
pub mod update;
pub mod validate;

pub use annotation::Annotation;
pub use update::{classify, update, Placement, UpdateResult};
pub use validate::{is_valid, resolve_overlaps, sanitize, validate};
