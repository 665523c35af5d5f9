//! Offset types for the two coordinate spaces.
//!
//! Both wrap a byte offset; keeping them distinct stops raw and display
//! positions from being mixed up:
//!
//! ```compile_fail
//! use quill_text_transform::{DisplayOffset, RawOffset};
//!
//! let raw = RawOffset(4);
//! let display = DisplayOffset(4);
//! assert_eq!(raw, display);
//! ```
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Byte offset into the raw text, where references appear as full tokens.
#[derive(Copy, Clone, Debug, Default, Eq, Ord, PartialOrd, PartialEq, Hash)]
pub struct RawOffset(pub usize);

/// Byte offset into the display text, where references are collapsed to labels.
#[derive(Copy, Clone, Debug, Default, Eq, Ord, PartialOrd, PartialEq, Hash)]
pub struct DisplayOffset(pub usize);

macro_rules! impl_offset_ops {
    ($offset:ident) => {
        impl Add for $offset {
            type Output = Self;

            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $offset {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl AddAssign for $offset {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl SubAssign for $offset {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl From<usize> for $offset {
            fn from(offset: usize) -> Self {
                Self(offset)
            }
        }

        impl From<$offset> for usize {
            fn from(offset: $offset) -> Self {
                offset.0
            }
        }
    };
}

impl_offset_ops!(RawOffset);
impl_offset_ops!(DisplayOffset);
