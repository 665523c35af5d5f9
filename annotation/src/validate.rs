//! Post-edit sanitation of annotation sets.
//!
//! [`validate`] drops annotations whose span no longer holds their raw token,
//! and [`resolve_overlaps`] turns any remaining collisions into a disjoint set.
//! Neither reports errors; a dropped annotation just stops existing.

use crate::annotation::Annotation;
use tracing::trace;

/// Whether `annotation` is in bounds, non-empty and matches `text`.
pub fn is_valid(text: &str, annotation: &Annotation) -> bool {
    !annotation.range.is_empty()
        && annotation.range.is_valid_for(text)
        && annotation.matches(text)
}

/// Keep only the annotations that satisfy [`is_valid`] against `text`.
pub fn validate(text: &str, annotations: &[Annotation]) -> Vec<Annotation> {
    annotations
        .iter()
        .filter(|annotation| {
            let valid = is_valid(text, annotation);
            if !valid {
                trace!(range = ?annotation.range, path = %annotation.target_path, "Dropping stale annotation");
            }
            valid
        })
        .cloned()
        .collect()
}

/// Make `annotations` pairwise disjoint.
///
/// Walks the set in start order. When the next annotation overlaps the one
/// being kept, the longer of the two wins and a tie keeps the earlier one.
/// This is a greedy left-to-right pass, not an optimal selection.
pub fn resolve_overlaps(annotations: &[Annotation]) -> Vec<Annotation> {
    let mut sorted = annotations.to_vec();
    sorted.sort_by_key(|annotation| annotation.range.start);

    let mut resolved: Vec<Annotation> = Vec::with_capacity(sorted.len());
    for next in sorted {
        match resolved.last_mut() {
            Some(current) if next.range.start < current.range.end => {
                if next.range.len() > current.range.len() {
                    trace!(kept = ?next.range, dropped = ?current.range, "Resolved overlap");
                    *current = next;
                } else {
                    trace!(kept = ?current.range, dropped = ?next.range, "Resolved overlap");
                }
            },
            _ => resolved.push(next),
        }
    }
    resolved
}

/// [`validate`] followed by [`resolve_overlaps`].
pub fn sanitize(text: &str, annotations: &[Annotation]) -> Vec<Annotation> {
    resolve_overlaps(&validate(text, annotations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_reference::Scheme;
    use quill_text::TextRange;

    const TEXT: &str = "see @file://src/a.kt for details";

    fn annotation(start: usize, end: usize) -> Annotation {
        Annotation::new(TextRange::new(start, end), "@x", "x", Scheme::File)
    }

    #[test]
    fn keeps_matching_annotation() {
        let good = Annotation::for_reference(4, Scheme::File, "src/a.kt");
        assert_eq!(validate(TEXT, &[good.clone()]), vec![good]);
    }

    #[test]
    fn drops_mismatch_out_of_bounds_and_empty() {
        let mismatch = Annotation::for_reference(4, Scheme::File, "src/b.kt");
        let shifted = Annotation::for_reference(5, Scheme::File, "src/a.kt");
        let out_of_bounds = Annotation::for_reference(30, Scheme::File, "src/a.kt");
        let empty = annotation(4, 4);
        assert!(validate(TEXT, &[mismatch, shifted, out_of_bounds, empty]).is_empty());
    }

    #[test]
    fn drops_mid_character_ranges() {
        let text = "é@file://a.rs";
        let good = Annotation::for_reference(2, Scheme::File, "a.rs");
        let bad = Annotation::new(TextRange::new(1, 13), "@a.rs", "a.rs", Scheme::File);
        assert_eq!(validate(text, &[good.clone(), bad]), vec![good]);
    }

    #[test]
    fn longer_annotation_wins_overlap() {
        let short = annotation(0, 4);
        let long = annotation(2, 10);
        assert_eq!(resolve_overlaps(&[short, long.clone()]), vec![long]);
    }

    #[test]
    fn tie_keeps_earlier() {
        let first = annotation(0, 5);
        let second = annotation(3, 8);
        assert_eq!(resolve_overlaps(&[second, first.clone()]), vec![first]);
    }

    #[test]
    fn duplicates_collapse_to_one() {
        let a = annotation(3, 9);
        assert_eq!(resolve_overlaps(&[a.clone(), a.clone(), a.clone()]), vec![a]);
    }

    #[test]
    fn disjoint_and_adjacent_are_kept_in_order() {
        let a = annotation(0, 3);
        let b = annotation(3, 6);
        let c = annotation(8, 9);
        assert_eq!(
            resolve_overlaps(&[c.clone(), a.clone(), b.clone()]),
            vec![a, b, c]
        );
    }

    #[test]
    fn resolution_is_deterministic_and_disjoint() {
        let input = vec![
            annotation(5, 9),
            annotation(0, 6),
            annotation(8, 20),
            annotation(8, 20),
            annotation(19, 21),
            annotation(30, 30),
            annotation(2, 3),
        ];
        let once = resolve_overlaps(&input);
        let twice = resolve_overlaps(&input);
        assert_eq!(once, twice);
        assert_eq!(resolve_overlaps(&once), once);
        for pair in once.windows(2) {
            assert!(pair[0].range.end <= pair[1].range.start, "{pair:?}");
        }
    }

    #[test]
    fn chain_of_growing_overlaps() {
        // Each annotation overlaps the previous and is longer, so the last wins.
        let input = vec![annotation(0, 2), annotation(1, 4), annotation(3, 9)];
        assert_eq!(resolve_overlaps(&input), vec![annotation(3, 9)]);
    }
}
