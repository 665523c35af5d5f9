//! Reference schemes and detection for Quill.
//!
//! - [`Scheme`] / [`SchemeRegistry`] - the recognized `@scheme://path` prefixes
//!   and their display and validation rules
//! - [`Detector`] - finds reference tokens in raw text and decides when the
//!   reference picker should open

pub mod detect;
pub mod scheme;

pub use detect::{
    completion_query, extract_references, should_trigger_picker, CompletionQuery, Detector,
    ExtractedReference,
};
pub use scheme::{ParseSchemeError, Scheme, SchemeRegistry, SchemeSpec, SCHEMES};
