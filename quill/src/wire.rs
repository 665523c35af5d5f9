//! Expansion of annotated text into its transmitted form.
//!
//! The wire form is the raw text with every reference written out as its full
//! `@scheme://path` token. Collapsed labels never leave the session.

use quill_annotation::Annotation;
use tracing::warn;

/// Rewrite every annotation span in `text` with its raw token.
///
/// Annotations are applied in start order; ones that are out of bounds or
/// overlap an earlier one are skipped and their span is copied verbatim.
pub fn expand(text: &str, annotations: &[Annotation]) -> String {
    let mut sorted: Vec<&Annotation> = annotations.iter().collect();
    sorted.sort_by_key(|annotation| annotation.range.start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for annotation in sorted {
        let range = annotation.range;
        if range.start < cursor || !range.is_valid_for(text) {
            warn!(?range, "Skipping annotation during wire expansion");
            continue;
        }
        out.push_str(&text[cursor..range.start]);
        out.push_str(&annotation.raw_text());
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}
