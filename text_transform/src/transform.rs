//! Transform pattern for the offset map.
//!
//! The raw text is split into a sequence of transforms, each either:
//!
//! - **Isomorphic**: 1:1 mapping, raw and display lengths are equal
//! - **Collapsed**: a reference token replaced by its label
//!
//! Representing the untransformed runs explicitly means every raw offset and
//! every display offset belongs to exactly one transform, so both directions
//! are a binary search over the transform starts.
//!
//! ```text
//! raw:      see @file://src/a.kt for details
//! display:  see @a.kt for details
//!
//! [Isomorphic(4), Collapsed(16 -> "@a.kt"), Isomorphic(12)]
//! ```

use smol_str::SmolStr;

/// Region where coordinates map 1:1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Isomorphic {
    pub len: usize,
}

/// A raw token shown as a shorter label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collapsed {
    pub raw_len: usize,
    pub label: SmolStr,
    /// Index of the source annotation in the slice the map was built from.
    pub annotation: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transform {
    Isomorphic(Isomorphic),
    Collapsed(Collapsed),
}

impl Transform {
    /// Extent in raw text.
    pub fn input_len(&self) -> usize {
        match self {
            Transform::Isomorphic(iso) => iso.len,
            Transform::Collapsed(collapsed) => collapsed.raw_len,
        }
    }

    /// Extent in display text.
    pub fn output_len(&self) -> usize {
        match self {
            Transform::Isomorphic(iso) => iso.len,
            Transform::Collapsed(collapsed) => collapsed.label.len(),
        }
    }
}

/// Start position of a transform in both coordinate spaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub input: usize,
    pub output: usize,
}

impl TransformSummary {
    /// Summary just past `transform` when it starts at `self`.
    pub fn advance(self, transform: &Transform) -> Self {
        Self {
            input: self.input + transform.input_len(),
            output: self.output + transform.output_len(),
        }
    }
}
