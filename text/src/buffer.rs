//! Immutable text snapshots with a selection.
//!
//! A [`TextBuffer`] is never edited in place. Every edit builds a new buffer,
//! so a snapshot handed to the annotation pipeline stays valid for the whole
//! run of that pipeline.

use crate::{change::TextChange, clip_offset, range::TextRange};

/// Caret or selection inside a buffer, always `start <= end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    start: usize,
    end: usize,
}

impl Selection {
    /// Collapsed selection at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Selection between two offsets given in any order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }

    /// Clamp both ends into `text` and onto char boundaries.
    pub fn clamp_to(&self, text: &str) -> Self {
        Self::new(clip_offset(text, self.start), clip_offset(text, self.end))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    selection: Selection,
}

impl TextBuffer {
    /// Buffer holding `text` with the caret at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let selection = Selection::caret(text.len());
        Self { text, selection }
    }

    /// Buffer holding `text` with an explicit selection, clamped into range.
    pub fn with_selection(text: impl Into<String>, selection: Selection) -> Self {
        let text = text.into();
        let selection = selection.clamp_to(&text);
        Self { text, selection }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Caret position, the end of the selection.
    pub fn cursor(&self) -> usize {
        self.selection.end
    }

    /// Same text with a new selection.
    pub fn select(&self, selection: Selection) -> Self {
        Self::with_selection(self.text.clone(), selection)
    }

    /// Replace `range` with `text`, leaving the caret after the inserted text.
    pub fn replace_range(&self, range: TextRange, text: &str) -> Self {
        let change = TextChange::new(range.start, range.end.max(range.start), text);
        let new_text = change.apply(&self.text);
        let caret = clip_offset(&self.text, range.start) + text.len();
        Self::with_selection(new_text, Selection::caret(caret))
    }

    /// Replace the current selection with `text`.
    pub fn replace_selection(&self, text: &str) -> Self {
        self.replace_range(self.selection.range(), text)
    }

    /// Delete the selection, or the character before a collapsed caret.
    pub fn delete_backward(&self) -> Self {
        if !self.selection.is_caret() {
            return self.replace_selection("");
        }
        let caret = self.cursor();
        match self.text[..caret].chars().next_back() {
            Some(ch) => self.replace_range(TextRange::new(caret - ch.len_utf8(), caret), ""),
            None => self.clone(),
        }
    }
}
