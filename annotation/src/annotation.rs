//! The [`Annotation`] span type.

use quill_reference::{ExtractedReference, Scheme};
use quill_text::TextRange;
use smol_str::SmolStr;

/// A resolved reference covering its raw `@scheme://path` token in the buffer.
///
/// The span always covers the raw token; `display_text` is the short label the
/// token collapses to when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub range: TextRange,
    pub display_text: SmolStr,
    pub target_path: String,
    pub scheme: Scheme,
}

impl Annotation {
    pub fn new(
        range: TextRange,
        display_text: impl Into<SmolStr>,
        target_path: impl Into<String>,
        scheme: Scheme,
    ) -> Self {
        Self {
            range,
            display_text: display_text.into(),
            target_path: target_path.into(),
            scheme,
        }
    }

    /// Annotation for a raw token starting at `start`, labelled by the scheme's
    /// display rule.
    pub fn for_reference(start: usize, scheme: Scheme, target_path: impl Into<String>) -> Self {
        let target_path = target_path.into();
        let display_text = scheme.display_text(&target_path);
        Self::with_label(start, scheme, target_path, display_text)
    }

    /// Annotation for a raw token starting at `start` with a caller supplied label.
    pub fn with_label(
        start: usize,
        scheme: Scheme,
        target_path: impl Into<String>,
        display_text: impl Into<SmolStr>,
    ) -> Self {
        let target_path = target_path.into();
        let end = start + scheme.token_prefix_len() + target_path.len();
        Self::new(TextRange::new(start, end), display_text, target_path, scheme)
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// The raw token this annotation covers, e.g. `@file://src/a.kt`.
    pub fn raw_text(&self) -> String {
        self.scheme.raw_token(&self.target_path)
    }

    /// True if the label is the one the scheme would derive from the path.
    pub fn has_derived_label(&self) -> bool {
        self.display_text == self.scheme.display_text(&self.target_path)
    }

    /// Content-match check: `text[range]` is exactly the raw token.
    pub fn matches(&self, text: &str) -> bool {
        self.range
            .slice(text)
            .and_then(|slice| slice.strip_prefix('@'))
            .and_then(|slice| slice.strip_prefix(self.scheme.prefix()))
            == Some(self.target_path.as_str())
    }

    pub fn overlaps(&self, other: &Annotation) -> bool {
        self.range.intersects(other.range)
    }
}

impl From<&ExtractedReference> for Annotation {
    fn from(reference: &ExtractedReference) -> Self {
        Self::new(
            reference.range,
            reference.display_text(),
            reference.path.clone(),
            reference.scheme,
        )
    }
}
