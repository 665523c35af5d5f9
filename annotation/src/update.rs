//! Remapping annotations through a [`TextChange`].
//!
//! Each annotation is classified against the replaced range independently:
//!
//! ```text
//! annotation:        [=========)
//! Before:    [--)                      a.end <= c.start, untouched
//! After:                          [--) a.start >= c.old_end, shifted by delta
//! Interior:            [--)            inside, boundary chars kept, regrown
//! Breach:        [------)              anything else, destroyed
//! ```
//!
//! A zero-width insertion exactly at either boundary is an adjacent append and
//! falls into `Before` (at the end) or `After` (at the start), so two annotations
//! sharing a boundary both survive such an insertion.

use crate::annotation::Annotation;
use quill_text::{TextChange, TextRange};
use tracing::{debug, trace};

/// Where a change sits relative to one annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
    Interior,
    Breach,
}

/// Output of [`update`]: every input annotation lands in exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub survived: Vec<Annotation>,
    pub destroyed: Vec<Annotation>,
}

/// Classify `range` against `change`.
pub fn classify(range: TextRange, change: &TextChange) -> Placement {
    if range.end <= change.start {
        return Placement::Before;
    }
    if range.start >= change.old_end {
        return Placement::After;
    }

    let inside = change.start >= range.start && change.old_end <= range.end;
    let removes_boundary =
        change.old_len() > 0 && (change.start == range.start || change.old_end == range.end);

    if inside && !removes_boundary && !change.is_deletion() {
        Placement::Interior
    } else {
        Placement::Breach
    }
}

/// Remap `annotations` through `change`.
///
/// Never mutates the input. A no-op change returns the input unchanged.
/// Both output lists keep input order.
pub fn update(annotations: &[Annotation], change: &TextChange) -> UpdateResult {
    if change.is_noop() {
        return UpdateResult {
            survived: annotations.to_vec(),
            destroyed: Vec::new(),
        };
    }

    let delta = change.delta();
    let mut result = UpdateResult::default();

    for annotation in annotations {
        let placement = classify(annotation.range, change);
        trace!(range = ?annotation.range, ?placement, "Classified annotation");

        match placement {
            Placement::Before => result.survived.push(annotation.clone()),
            Placement::After => {
                let mut shifted = annotation.clone();
                shifted.range = annotation.range.shift(delta);
                result.survived.push(shifted);
            },
            Placement::Interior => match regrow(annotation, change) {
                Some(regrown) => result.survived.push(regrown),
                None => result.destroyed.push(annotation.clone()),
            },
            Placement::Breach => result.destroyed.push(annotation.clone()),
        }
    }

    debug!(
        start = change.start,
        old_end = change.old_end,
        delta,
        survived = result.survived.len(),
        destroyed = result.destroyed.len(),
        "Updated annotations"
    );
    result
}

/// Apply an interior edit to the annotation's token, keeping its anchor.
///
/// Fails when the edit reaches into the `@scheme://` part, introduces
/// whitespace, or leaves a path the scheme rejects.
fn regrow(annotation: &Annotation, change: &TextChange) -> Option<Annotation> {
    let prefix_len = annotation.scheme.token_prefix_len();
    let rel_start = change.start - annotation.range.start;
    let rel_end = change.old_end - annotation.range.start;

    if rel_start < prefix_len || change.new_text.contains(char::is_whitespace) {
        return None;
    }

    let raw = annotation.raw_text();
    let mut new_raw = String::with_capacity(raw.len() + change.new_text.len());
    new_raw.push_str(raw.get(..rel_start)?);
    new_raw.push_str(&change.new_text);
    new_raw.push_str(raw.get(rel_end..)?);

    let target_path = new_raw.get(prefix_len..)?.to_string();
    if !annotation.scheme.is_valid_path(&target_path) {
        return None;
    }

    let display_text = if annotation.has_derived_label() {
        annotation.scheme.display_text(&target_path)
    } else {
        annotation.display_text.clone()
    };

    Some(Annotation {
        range: annotation.range.grow(change.delta()),
        display_text,
        target_path,
        scheme: annotation.scheme,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_reference::Scheme;
    use quill_text::analyze;

    const TEXT: &str = "see @file://src/a.kt for details";

    fn a_kt() -> Annotation {
        Annotation::with_label(4, Scheme::File, "src/a.kt", "@a.kt")
    }

    #[test]
    fn noop_change_returns_identical_set() {
        let annotations = vec![a_kt()];
        let result = update(&annotations, &analyze(TEXT, TEXT));
        assert_eq!(result.survived, annotations);
        assert!(result.destroyed.is_empty());
    }

    #[test]
    fn append_at_end_leaves_annotation() {
        let new = format!("{TEXT}!");
        let change = analyze(TEXT, &new);
        assert_eq!(change, TextChange::insertion(TEXT.len(), "!"));

        let result = update(&[a_kt()], &change);
        assert_eq!(result.survived, vec![a_kt()]);
        assert!(result.destroyed.is_empty());
    }

    #[test]
    fn interior_deletion_destroys() {
        let change = TextChange::deletion(TextRange::new(10, 15));
        let result = update(&[a_kt()], &change);
        assert!(result.survived.is_empty());
        assert_eq!(result.destroyed, vec![a_kt()]);
    }

    #[test]
    fn edit_before_shifts() {
        let new = format!("please {TEXT}");
        let change = analyze(TEXT, &new);
        let result = update(&[a_kt()], &change);
        let moved = &result.survived[0];
        assert_eq!(moved.range, TextRange::new(11, 27));
        assert!(moved.matches(&new));
    }

    #[test]
    fn deletion_before_shifts_left() {
        let change = TextChange::deletion(TextRange::new(0, 4));
        let result = update(&[a_kt()], &change);
        assert_eq!(result.survived[0].range, TextRange::new(0, 16));
    }

    #[test]
    fn insertion_at_start_boundary_shifts() {
        let change = TextChange::insertion(4, "x");
        assert_eq!(classify(a_kt().range, &change), Placement::After);
        let result = update(&[a_kt()], &change);
        assert_eq!(result.survived[0].range, TextRange::new(5, 21));
    }

    #[test]
    fn insertion_at_end_boundary_is_untouched() {
        let change = TextChange::insertion(20, "x");
        assert_eq!(classify(a_kt().range, &change), Placement::Before);
    }

    #[test]
    fn interior_insertion_regrows_path() {
        // "src/a.kt" -> "src/ab.kt"
        let change = TextChange::insertion(17, "b");
        let result = update(&[a_kt()], &change);
        let grown = &result.survived[0];
        assert_eq!(grown.range, TextRange::new(4, 21));
        assert_eq!(grown.target_path, "src/ab.kt");
        assert_eq!(grown.display_text, "@ab.kt");
        assert!(grown.matches(&change.apply(TEXT)));
    }

    #[test]
    fn interior_substitution_keeps_custom_label() {
        let custom = Annotation::with_label(4, Scheme::File, "src/a.kt", "@Main");
        // "src" -> "lib"
        let change = TextChange::new(12, 15, "lib");
        let result = update(&[custom], &change);
        let kept = &result.survived[0];
        assert_eq!(kept.target_path, "lib/a.kt");
        assert_eq!(kept.display_text, "@Main");
    }

    #[test]
    fn edit_inside_scheme_prefix_destroys() {
        // "@file://" -> "@fxle://"
        let change = TextChange::new(6, 7, "x");
        assert_eq!(classify(a_kt().range, &change), Placement::Interior);
        let result = update(&[a_kt()], &change);
        assert_eq!(result.destroyed.len(), 1);
    }

    #[test]
    fn interior_whitespace_splits_and_destroys() {
        let change = TextChange::insertion(15, " ");
        let result = update(&[a_kt()], &change);
        assert_eq!(result.destroyed.len(), 1);
    }

    #[test]
    fn removing_boundary_character_destroys() {
        let first = TextChange::new(4, 5, "#");
        let last = TextChange::new(19, 20, "x");
        assert_eq!(classify(a_kt().range, &first), Placement::Breach);
        assert_eq!(classify(a_kt().range, &last), Placement::Breach);
    }

    #[test]
    fn straddling_edits_destroy() {
        for change in [
            TextChange::new(2, 6, ""),
            TextChange::new(18, 25, "zz"),
            TextChange::new(0, 32, "replaced"),
        ] {
            let result = update(&[a_kt()], &change);
            assert!(result.survived.is_empty(), "{change:?}");
            assert_eq!(result.destroyed.len(), 1);
        }
    }

    #[test]
    fn shared_boundary_insertion_keeps_both() {
        let text = "@file://a.rs@file://b.rs";
        let left = Annotation::for_reference(0, Scheme::File, "a.rs");
        let right = Annotation::for_reference(12, Scheme::File, "b.rs");
        assert!(left.matches(text) && right.matches(text));

        let change = TextChange::insertion(12, " ");
        let result = update(&[left.clone(), right], &change);
        assert!(result.destroyed.is_empty());
        assert_eq!(result.survived[0], left);
        assert_eq!(result.survived[1].range, TextRange::new(13, 25));
    }

    #[test]
    fn input_is_not_mutated() {
        let annotations = vec![a_kt()];
        let _ = update(&annotations, &TextChange::deletion(TextRange::new(0, 10)));
        assert_eq!(annotations, vec![a_kt()]);
    }
}
