//! Minimal change descriptors between two text snapshots.
//!
//! The editing surface only ever hands us whole snapshots, so every edit is
//! recovered by trimming the common prefix and suffix of the old and new text.
//! Whatever is left in the middle is the replaced region.
//!
//! ```text
//! old:  see @file://src/a.kt for details
//! new:  see @file://src/a.kt for details!
//!                                        ^ start == old_end == 32, new_text == "!"
//! ```

use crate::range::TextRange;
use tracing::trace;

/// A single contiguous replacement: `old[start..old_end]` becomes `new_text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextChange {
    pub start: usize,
    pub old_end: usize,
    pub new_text: String,
}

impl TextChange {
    pub fn new(start: usize, old_end: usize, new_text: impl Into<String>) -> Self {
        debug_assert!(start <= old_end, "Invalid change: start > old_end");
        Self {
            start,
            old_end,
            new_text: new_text.into(),
        }
    }

    /// Pure insertion of `text` at `at`.
    pub fn insertion(at: usize, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    /// Pure deletion of `range`.
    pub fn deletion(range: TextRange) -> Self {
        Self::new(range.start, range.end, String::new())
    }

    /// Compute the minimal change turning `old` into `new`.
    pub fn analyze(old: &str, new: &str) -> Self {
        analyze(old, new)
    }

    /// The replaced range in old-text coordinates.
    pub fn old_range(&self) -> TextRange {
        TextRange::new(self.start, self.old_end)
    }

    /// The inserted range in new-text coordinates.
    pub fn new_range(&self) -> TextRange {
        TextRange::new(self.start, self.new_end())
    }

    pub fn old_len(&self) -> usize {
        self.old_end - self.start
    }

    pub fn new_len(&self) -> usize {
        self.new_text.len()
    }

    pub fn new_end(&self) -> usize {
        self.start + self.new_text.len()
    }

    /// Signed length difference, `new_len - old_len`.
    pub fn delta(&self) -> isize {
        self.new_len() as isize - self.old_len() as isize
    }

    /// True when applying the change leaves the text untouched.
    pub fn is_noop(&self) -> bool {
        self.start == self.old_end && self.new_text.is_empty()
    }

    pub fn is_insertion(&self) -> bool {
        self.start == self.old_end && !self.new_text.is_empty()
    }

    pub fn is_deletion(&self) -> bool {
        self.start < self.old_end && self.new_text.is_empty()
    }

    /// Apply the change to `old`, returning the new snapshot.
    ///
    /// Out-of-range or mid-character bounds are clamped to the nearest valid
    /// position instead of panicking.
    pub fn apply(&self, old: &str) -> String {
        let start = crate::clip_offset(old, self.start);
        let end = crate::clip_offset(old, self.old_end).max(start);

        let mut out = String::with_capacity(old.len() - (end - start) + self.new_text.len());
        out.push_str(&old[..start]);
        out.push_str(&self.new_text);
        out.push_str(&old[end..]);
        out
    }
}

/// Compute the minimal contiguous change between two snapshots.
///
/// Total over all string pairs. Identical input yields a zero-length change
/// (`start == old_end`, empty `new_text`); callers treat that as a no-op.
pub fn analyze(old: &str, new: &str) -> TextChange {
    let prefix_len = common_prefix_len(old, new);

    // The suffix scan may not eat into the prefix on either side.
    let max_backtrack = old.len().min(new.len()) - prefix_len;
    let suffix_len = common_suffix_len(&old[prefix_len..], &new[prefix_len..], max_backtrack);

    let change = TextChange {
        start: prefix_len,
        old_end: old.len() - suffix_len,
        new_text: new[prefix_len..new.len() - suffix_len].to_string(),
    };
    trace!(
        start = change.start,
        old_end = change.old_end,
        inserted = change.new_text.len(),
        "Analyzed text change"
    );
    change
}

/// Length in bytes of the longest common prefix, on a char boundary.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((idx, _), _)| idx)
        .unwrap_or_else(|| a.len().min(b.len()))
}

/// Length in bytes of the longest common suffix, capped at `max_len`.
fn common_suffix_len(a: &str, b: &str, max_len: usize) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().rev().zip(b.chars().rev()) {
        if ca != cb || len + ca.len_utf8() > max_len {
            break;
        }
        len += ca.len_utf8();
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_is_noop() {
        let change = analyze("hello world", "hello world");
        assert!(change.is_noop());
        assert_eq!(change.start, change.old_end);
        assert_eq!(change.delta(), 0);
    }

    #[test]
    fn empty_to_empty_is_noop() {
        assert!(analyze("", "").is_noop());
    }

    #[test]
    fn append_at_end() {
        let old = "see @file://src/a.kt for details";
        let new = "see @file://src/a.kt for details!";
        assert_eq!(analyze(old, new), TextChange::insertion(32, "!"));
    }

    #[test]
    fn interior_deletion() {
        let change = analyze("abcdef", "abef");
        assert_eq!(change, TextChange::new(2, 4, ""));
        assert!(change.is_deletion());
        assert_eq!(change.delta(), -2);
    }

    #[test]
    fn substitution() {
        let change = analyze("the cat sat", "the dog sat");
        assert_eq!(change, TextChange::new(4, 7, "dog"));
    }

    #[test]
    fn complete_replacement() {
        let change = analyze("abc", "xyz");
        assert_eq!(change, TextChange::new(0, 3, "xyz"));
    }

    #[test]
    fn repeated_characters_do_not_overlap_scans() {
        // Prefix eats "aa", the suffix scan must stop before crossing it.
        let change = analyze("aa", "aaa");
        assert_eq!(change, TextChange::insertion(2, "a"));
        assert_eq!(change.apply("aa"), "aaa");

        let change = analyze("aaa", "aa");
        assert_eq!(change, TextChange::new(2, 3, ""));
    }

    #[test]
    fn multibyte_boundaries_are_respected() {
        let change = analyze("café", "cafè");
        assert_eq!(change.start, 3);
        assert_eq!(change.old_end, 5);
        assert_eq!(change.new_text, "è");
        assert_eq!(change.apply("café"), "cafè");
    }

    #[test]
    fn apply_reproduces_new_text() {
        let pairs = [
            ("", "abc"),
            ("abc", ""),
            ("hello world", "hello brave new world"),
            ("@file://a.rs ", "@file://ab.rs "),
            ("xyz", "xyz"),
        ];
        for (old, new) in pairs {
            assert_eq!(analyze(old, new).apply(old), new, "{old:?} -> {new:?}");
        }
    }

    #[test]
    fn apply_clamps_out_of_range_change() {
        let change = TextChange::new(10, 20, "!");
        assert_eq!(change.apply("abc"), "abc!");
    }
}
