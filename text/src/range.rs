//! Text ranges and positions

use std::ops::Range;

/// A half-open range in text, represented as byte offsets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Create a new text range
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Invalid range: start > end");
        Self { start, end }
    }

    /// Create an empty range at the given position
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Get the length of the range
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range is empty
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this range contains the given offset
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Check if `offset` lies strictly between the bounds
    pub fn contains_interior(&self, offset: usize) -> bool {
        self.start < offset && offset < self.end
    }

    /// Check if this range contains the given range
    pub fn contains_range(&self, other: &TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check if this range intersects with another range
    pub fn intersects(&self, other: TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Get the intersection of two ranges
    pub fn intersect(&self, other: &TextRange) -> Option<TextRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(TextRange::new(start, end))
        } else {
            None
        }
    }

    /// Shift both bounds by a signed delta, saturating at zero
    pub fn shift(&self, delta: isize) -> TextRange {
        TextRange {
            start: apply_delta(self.start, delta),
            end: apply_delta(self.end, delta),
        }
    }

    /// Move only the end bound by a signed delta, never past `start`
    pub fn grow(&self, delta: isize) -> TextRange {
        TextRange {
            start: self.start,
            end: apply_delta(self.end, delta).max(self.start),
        }
    }

    /// Check if the range can index into `text` without panicking
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.start <= self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }

    /// Slice `text` by this range, or `None` if the range does not fit
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

/// Apply a signed delta to an offset, clamping at zero
pub fn apply_delta(offset: usize, delta: isize) -> usize {
    if delta >= 0 {
        offset.saturating_add(delta.unsigned_abs())
    } else {
        offset.saturating_sub(delta.unsigned_abs())
    }
}

impl From<Range<usize>> for TextRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<TextRange> for Range<usize> {
    fn from(range: TextRange) -> Self {
        range.start..range.end
    }
}
