//! Bidirectional mapping between raw and display offsets.
//!
//! An [`OffsetMap`] is built once per `(raw text, annotations)` pair and then
//! answers any number of conversions with a binary search.
//!
//! # Interior offsets
//!
//! Raw offsets strictly inside a collapsed token are interpolated linearly onto
//! the label, which is good enough to place a caret but does not round-trip.
//! Display offsets inside a label always map back to the raw start of the token,
//! so navigating into a collapsed reference never lands mid-path.

use crate::{
    dimensions::{DisplayOffset, RawOffset},
    traits::CoordinateTransform,
    transform::{Collapsed, Isomorphic, Transform, TransformSummary},
};
use quill_annotation::Annotation;
use quill_text::{clip_offset, TextRange};
use tracing::{trace, warn};

/// Location of one collapsed token in both spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSpan {
    pub raw: TextRange,
    pub display: TextRange,
    /// Index of the source annotation in the slice the map was built from.
    pub annotation: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OffsetMap {
    /// Transforms paired with their start positions, in text order.
    transforms: Vec<(TransformSummary, Transform)>,
    raw_len: usize,
    display_text: String,
}

impl OffsetMap {
    /// Build the map for `raw_text` with each annotation collapsed to its label.
    ///
    /// Annotations do not need to be sorted. Ones that are empty, out of
    /// bounds, overlapping an earlier one or carrying an empty label are left
    /// uncollapsed.
    pub fn new(raw_text: &str, annotations: &[Annotation]) -> Self {
        let mut order: Vec<usize> = (0..annotations.len()).collect();
        order.sort_by_key(|&idx| annotations[idx].range.start);

        let mut map = Self {
            transforms: Vec::with_capacity(annotations.len() * 2 + 1),
            raw_len: raw_text.len(),
            display_text: String::with_capacity(raw_text.len()),
        };

        let mut cursor = 0;
        for idx in order {
            let annotation = &annotations[idx];
            let range = annotation.range;
            if range.is_empty() || !range.is_valid_for(raw_text) || range.start < cursor {
                warn!(?range, len = raw_text.len(), "Skipping unmappable annotation");
                continue;
            }
            if annotation.display_text.is_empty() {
                continue;
            }

            map.push_isomorphic(&raw_text[cursor..range.start]);
            map.push(Transform::Collapsed(Collapsed {
                raw_len: range.len(),
                label: annotation.display_text.clone(),
                annotation: idx,
            }));
            map.display_text.push_str(&annotation.display_text);
            cursor = range.end;
        }
        map.push_isomorphic(&raw_text[cursor..]);

        trace!(
            raw_len = map.raw_len,
            display_len = map.display_text.len(),
            transforms = map.transforms.len(),
            "Built offset map"
        );
        map
    }

    /// Map for text without any collapsed tokens.
    pub fn identity(raw_text: &str) -> Self {
        Self::new(raw_text, &[])
    }

    fn push_isomorphic(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.push(Transform::Isomorphic(Isomorphic { len: text.len() }));
        self.display_text.push_str(text);
    }

    fn push(&mut self, transform: Transform) {
        let start = self
            .transforms
            .last()
            .map(|(summary, last)| summary.advance(last))
            .unwrap_or_default();
        self.transforms.push((start, transform));
    }

    pub fn raw_len(&self) -> usize {
        self.raw_len
    }

    pub fn display_len(&self) -> usize {
        self.display_text.len()
    }

    /// The display string, with every mapped reference collapsed.
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Index of the transform containing raw `offset`, end exclusive.
    fn transform_at_raw(&self, offset: usize) -> Option<usize> {
        let idx = self
            .transforms
            .partition_point(|(start, _)| start.input <= offset);
        let idx = idx.checked_sub(1)?;
        let (start, transform) = &self.transforms[idx];
        (offset < start.input + transform.input_len()).then_some(idx)
    }

    /// Index of the transform containing display `offset`, end exclusive.
    fn transform_at_display(&self, offset: usize) -> Option<usize> {
        let idx = self
            .transforms
            .partition_point(|(start, _)| start.output <= offset);
        let idx = idx.checked_sub(1)?;
        let (start, transform) = &self.transforms[idx];
        (offset < start.output + transform.output_len()).then_some(idx)
    }

    /// Project a raw offset into display space.
    pub fn to_display(&self, raw: RawOffset) -> DisplayOffset {
        let raw = raw.0.min(self.raw_len);
        let Some(idx) = self.transform_at_raw(raw) else {
            return DisplayOffset(self.display_len());
        };

        let (start, transform) = &self.transforms[idx];
        let offset = raw - start.input;
        match transform {
            Transform::Isomorphic(_) => DisplayOffset(start.output + offset),
            Transform::Collapsed(collapsed) => {
                let label = collapsed.label.as_str();
                let scaled = interpolate(offset, collapsed.raw_len, label.len());
                DisplayOffset(start.output + clip_offset(label, scaled))
            },
        }
    }

    /// Project a display offset back into raw space.
    pub fn to_raw(&self, display: DisplayOffset) -> RawOffset {
        let display = display.0.min(self.display_len());
        let Some(idx) = self.transform_at_display(display) else {
            return RawOffset(self.raw_len);
        };

        let (start, transform) = &self.transforms[idx];
        match transform {
            Transform::Isomorphic(_) => RawOffset(start.input + (display - start.output)),
            Transform::Collapsed(_) => RawOffset(start.input),
        }
    }

    fn token_span(&self, idx: usize) -> Option<TokenSpan> {
        let (start, transform) = &self.transforms[idx];
        let Transform::Collapsed(collapsed) = transform else {
            return None;
        };
        Some(TokenSpan {
            raw: TextRange::new(start.input, start.input + collapsed.raw_len),
            display: TextRange::new(start.output, start.output + collapsed.label.len()),
            annotation: collapsed.annotation,
        })
    }

    /// The collapsed token covering raw `offset`, end exclusive.
    pub fn token_at_raw(&self, raw: RawOffset) -> Option<TokenSpan> {
        self.token_span(self.transform_at_raw(raw.0)?)
    }

    /// The collapsed token covering display `offset`, end exclusive.
    pub fn token_at_display(&self, display: DisplayOffset) -> Option<TokenSpan> {
        self.token_span(self.transform_at_display(display.0)?)
    }

    /// All collapsed tokens in text order.
    pub fn tokens(&self) -> impl Iterator<Item = TokenSpan> + '_ {
        (0..self.transforms.len()).filter_map(|idx| self.token_span(idx))
    }
}

impl CoordinateTransform<RawOffset, DisplayOffset> for OffsetMap {
    fn to_coords(&self, point: RawOffset) -> DisplayOffset {
        self.to_display(point)
    }

    fn from_coords(&self, point: DisplayOffset) -> RawOffset {
        self.to_raw(point)
    }
}

/// `round(offset / from_len * to_len)` in integers, rounding halves up.
fn interpolate(offset: usize, from_len: usize, to_len: usize) -> usize {
    if from_len == 0 {
        return 0;
    }
    (offset * to_len * 2 + from_len) / (from_len * 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_reference::Scheme;

    const TEXT: &str = "see @file://src/a.kt for details";

    fn map() -> OffsetMap {
        OffsetMap::new(
            TEXT,
            &[Annotation::with_label(4, Scheme::File, "src/a.kt", "@a.kt")],
        )
    }

    #[test]
    fn identity_map_round_trips_everything() {
        let map = OffsetMap::identity("hello");
        for offset in 0..=5 {
            assert_eq!(map.to_display(RawOffset(offset)), DisplayOffset(offset));
            assert_eq!(map.to_raw(DisplayOffset(offset)), RawOffset(offset));
        }
        assert_eq!(map.display_text(), "hello");
    }

    #[test]
    fn empty_text() {
        let map = OffsetMap::identity("");
        assert_eq!(map.to_display(RawOffset(3)), DisplayOffset(0));
        assert_eq!(map.to_raw(DisplayOffset(3)), RawOffset(0));
        assert_eq!(map.tokens().count(), 0);
    }

    #[test]
    fn display_text_collapses_reference() {
        let map = map();
        assert_eq!(map.display_text(), "see @a.kt for details");
        assert_eq!(map.raw_len(), 32);
        assert_eq!(map.display_len(), 21);
    }

    #[test]
    fn offsets_before_and_after_token() {
        let map = map();
        assert_eq!(map.to_display(RawOffset(2)), DisplayOffset(2));
        assert_eq!(map.to_display(RawOffset(4)), DisplayOffset(4));
        // Token end: 20 -> 4 + 5.
        assert_eq!(map.to_display(RawOffset(20)), DisplayOffset(9));
        assert_eq!(map.to_display(RawOffset(32)), DisplayOffset(21));

        assert_eq!(map.to_raw(DisplayOffset(9)), RawOffset(20));
        assert_eq!(map.to_raw(DisplayOffset(21)), RawOffset(32));
    }

    #[test]
    fn interior_raw_offsets_interpolate() {
        let map = map();
        // 8 of 16 raw bytes -> round(8 / 16 * 5) = 3 (2.5 rounds up).
        assert_eq!(map.to_display(RawOffset(12)), DisplayOffset(7));
        // 1 of 16 -> round(0.3125) = 0.
        assert_eq!(map.to_display(RawOffset(5)), DisplayOffset(4));
        // 15 of 16 -> round(4.6875) = 5.
        assert_eq!(map.to_display(RawOffset(19)), DisplayOffset(9));
    }

    #[test]
    fn interior_display_offsets_snap_to_token_start() {
        let map = map();
        for display in 4..9 {
            assert_eq!(map.to_raw(DisplayOffset(display)), RawOffset(4));
        }
    }

    #[test]
    fn out_of_range_offsets_clamp() {
        let map = map();
        assert_eq!(map.to_display(RawOffset(1000)), DisplayOffset(21));
        assert_eq!(map.to_raw(DisplayOffset(1000)), RawOffset(32));
    }

    #[test]
    fn round_trip_outside_tokens() {
        let text = "@file://a.rs and @https://example.com/x @git://h/r.git";
        let annotations = [
            Annotation::for_reference(0, Scheme::File, "a.rs"),
            Annotation::for_reference(17, Scheme::Https, "example.com/x"),
            Annotation::for_reference(40, Scheme::Git, "h/r.git"),
        ];
        for annotation in &annotations {
            assert!(annotation.matches(text), "{annotation:?}");
        }
        let map = OffsetMap::new(text, &annotations);
        assert_eq!(map.display_text(), "@a.rs and @example.com @r");

        for raw in 0..=text.len() {
            let inside = annotations
                .iter()
                .any(|a| a.range.contains_interior(raw));
            if inside {
                continue;
            }
            let display = map.to_display(RawOffset(raw));
            assert_eq!(map.to_raw(display), RawOffset(raw), "raw {raw}");
        }
    }

    #[test]
    fn mapping_is_monotonic() {
        let map = map();
        let mut last = DisplayOffset(0);
        for raw in 0..=TEXT.len() {
            let display = map.to_display(RawOffset(raw));
            assert!(display >= last);
            last = display;
        }
    }

    #[test]
    fn adjacent_tokens() {
        let text = "@file://a.rs@file://b.rs";
        let annotations = [
            Annotation::for_reference(0, Scheme::File, "a.rs"),
            Annotation::for_reference(12, Scheme::File, "b.rs"),
        ];
        let map = OffsetMap::new(text, &annotations);
        assert_eq!(map.display_text(), "@a.rs@b.rs");
        assert_eq!(map.to_display(RawOffset(12)), DisplayOffset(5));
        assert_eq!(map.to_raw(DisplayOffset(5)), RawOffset(12));
        assert_eq!(map.to_raw(DisplayOffset(7)), RawOffset(12));
    }

    #[test]
    fn unsorted_and_invalid_annotations() {
        let annotations = [
            Annotation::for_reference(40, Scheme::File, "zzz"),
            Annotation::with_label(4, Scheme::File, "src/a.kt", "@a.kt"),
            Annotation::new(TextRange::new(10, 14), "@x", "x", Scheme::File),
        ];
        let map = OffsetMap::new(TEXT, &annotations);
        assert_eq!(map.display_text(), "see @a.kt for details");
        let tokens: Vec<_> = map.tokens().collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].annotation, 1);
    }

    #[test]
    fn hit_testing() {
        let map = map();
        let token = map.token_at_display(DisplayOffset(6)).expect("token");
        assert_eq!(token.raw, TextRange::new(4, 20));
        assert_eq!(token.display, TextRange::new(4, 9));
        assert_eq!(map.token_at_raw(RawOffset(19)), Some(token));
        assert_eq!(map.token_at_raw(RawOffset(20)), None);
        assert_eq!(map.token_at_display(DisplayOffset(9)), None);
    }

    #[test]
    fn interpolation_respects_label_char_boundaries() {
        let text = "@file://src/héé";
        let annotation = Annotation::for_reference(0, Scheme::File, "src/héé");
        assert!(annotation.matches(text));
        let map = OffsetMap::new(text, &[annotation]);
        assert_eq!(map.display_text(), "@héé");
        for raw in 0..=text.len() {
            let display = map.to_display(RawOffset(raw)).0;
            assert!(map.display_text().is_char_boundary(display), "raw {raw}");
        }
    }

    #[test]
    fn coordinate_transform_matches_inherent_methods() {
        let map = map();
        assert_eq!(map.to_coords(RawOffset(25)), map.to_display(RawOffset(25)));
        assert_eq!(map.from_coords(DisplayOffset(6)), RawOffset(4));
    }
}
