//! Quill, an annotation-aware text editing engine.
//!
//! A plain-text buffer carries reference spans (`@file://src/a.kt`,
//! `@https://docs.rs`, ...) that follow the text through arbitrary edits and
//! render as short labels. The building blocks live in their own crates:
//!
//! - [`quill_text`] - buffer, ranges and the change analyzer
//! - [`quill_reference`] - schemes and reference detection
//! - [`quill_annotation`] - annotation updates and sanitation
//! - [`quill_text_transform`] - raw/display offset mapping
//!
//! This crate ties them together in a [`Session`] configured by [`Config`].

pub mod config;
pub mod session;
pub mod wire;

pub use config::Config;
pub use quill_annotation::Annotation;
pub use quill_reference::{CompletionQuery, Scheme};
pub use quill_text::{Selection, TextChange, TextRange};
pub use quill_text_transform::{CoordinateTransform, DisplayOffset, OffsetMap, RawOffset};
pub use session::{EditOutcome, ReferenceCandidate, Session};
