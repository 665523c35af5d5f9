//! Coordinate mapping between raw text and its collapsed display form.
//!
//! Annotated references are stored in the buffer as full `@scheme://path`
//! tokens but rendered as short labels. This crate maps offsets between the
//! two spaces:
//!
//! ```text
//! raw:      see @file://src/a.kt for details
//!               |--------------|
//! display:  see @a.kt for details
//!               |---|
//! ```
//!
//! # Type Safety
//!
//! [`RawOffset`] and [`DisplayOffset`] are distinct types, so the compiler
//! rejects code that mixes the two spaces.
//!
//! # Usage
//!
//! ```ignore
//! let map = OffsetMap::new(text, &annotations);
//! let display = map.to_coords(RawOffset(cursor));
//! let back = map.from_coords(display);
//! ```
mod dimensions;
mod offset_map;
mod traits;
mod transform;

pub use dimensions::{DisplayOffset, RawOffset};
pub use offset_map::{OffsetMap, TokenSpan};
pub use traits::CoordinateTransform;
pub use transform::{Collapsed, Isomorphic, Transform, TransformSummary};
