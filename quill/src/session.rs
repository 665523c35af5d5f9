//! Editing session holding a text buffer and its annotations.
//!
//! A [`Session`] is the single owner of the current [`TextBuffer`] and the
//! annotation set. Every text change runs the same pipeline:
//!
//! ```text
//! new text -> analyze -> update -> sanitize -> auto-annotate -> EditOutcome
//! ```
//!
//! Each stage returns new collections, so snapshots handed out earlier (such
//! as an [`OffsetMap`] held by a render pass) never change under the holder.
//!
//! # Offset map cache
//!
//! The session keeps a version counter that is bumped whenever the text or the
//! annotation set changes. [`Session::offset_map`] rebuilds the map only when
//! the cached copy was built for an older version.

use crate::{config::Config, wire};
use quill_annotation::{sanitize, update, Annotation, UpdateResult};
use quill_reference::{CompletionQuery, Detector, Scheme};
use quill_text::{analyze, Selection, TextBuffer, TextChange, TextRange};
use quill_text_transform::{DisplayOffset, OffsetMap, RawOffset};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::{cell::RefCell, sync::Arc};
use tracing::{debug, info, trace, warn};

/// Result of one edit: the change applied and how the annotation set moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub change: TextChange,
    /// Annotations removed by the edit, as they were before it.
    pub destroyed: Vec<Annotation>,
    /// Annotations added by the edit, in their post-edit positions.
    pub created: Vec<Annotation>,
}

impl EditOutcome {
    fn unchanged(at: usize) -> Self {
        Self {
            change: TextChange::insertion(at, ""),
            destroyed: Vec::new(),
            created: Vec::new(),
        }
    }

    /// True when neither the text nor the annotations changed.
    pub fn is_noop(&self) -> bool {
        self.change.is_noop() && self.destroyed.is_empty() && self.created.is_empty()
    }
}

/// A resolved picker entry, e.g. a file from the file index.
///
/// The label is opaque to the session and is shown as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCandidate {
    pub scheme: Scheme,
    pub target_path: String,
    pub display_text: SmolStr,
}

impl ReferenceCandidate {
    /// Candidate labelled by the scheme's display rule.
    pub fn new(scheme: Scheme, target_path: impl Into<String>) -> Self {
        let target_path = target_path.into();
        let display_text = scheme.display_text(&target_path);
        Self {
            scheme,
            target_path,
            display_text,
        }
    }

    pub fn with_label(
        scheme: Scheme,
        target_path: impl Into<String>,
        display_text: impl Into<SmolStr>,
    ) -> Self {
        Self {
            scheme,
            target_path: target_path.into(),
            display_text: display_text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    detector: Detector,
    buffer: TextBuffer,
    annotations: Vec<Annotation>,
    version: u64,
    offset_map: RefCell<Option<(u64, Arc<OffsetMap>)>>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let detector = config.detector();
        Self {
            config,
            detector,
            buffer: TextBuffer::default(),
            annotations: Vec::new(),
            version: 0,
            offset_map: RefCell::new(None),
        }
    }

    /// Session over existing text, annotating every reference already in it.
    pub fn with_text(config: Config, text: impl Into<String>) -> Self {
        let mut session = Self::new(config);
        session.buffer = TextBuffer::new(text);
        session.annotations = session.detect_all(session.buffer.text());
        session
    }

    /// Session restored from transmitted text.
    ///
    /// Wire text carries no labels, so every reference gets its derived label.
    pub fn from_wire(config: Config, text: impl Into<String>) -> Self {
        Self::with_text(config, text)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn selection(&self) -> Selection {
        self.buffer.selection()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    /// Current annotations, sorted by start and pairwise disjoint.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Counter bumped on every change to the text or the annotation set.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the whole text, as a text field reports it after an edit.
    pub fn set_text(&mut self, text: impl Into<String>, selection: Selection) -> EditOutcome {
        let buffer = TextBuffer::with_selection(text, selection);
        self.apply(buffer, None)
    }

    /// Replace the selection with `text`.
    pub fn insert(&mut self, text: &str) -> EditOutcome {
        let buffer = self.buffer.replace_selection(text);
        self.apply(buffer, None)
    }

    /// Backspace.
    ///
    /// With `atomic_delete`, a caret directly after a reference removes the
    /// whole reference instead of its last character.
    pub fn delete_backward(&mut self) -> EditOutcome {
        let selection = self.buffer.selection();
        if self.config.atomic_delete && selection.is_caret() {
            let caret = selection.end();
            if let Some(range) = self
                .annotations
                .iter()
                .find(|annotation| annotation.range.end == caret)
                .map(|annotation| annotation.range)
            {
                debug!(?range, "Deleting reference atomically");
                let buffer = self.buffer.replace_range(range, "");
                return self.apply(buffer, None);
            }
        }
        let buffer = self.buffer.delete_backward();
        self.apply(buffer, None)
    }

    /// Move the selection without changing the text.
    pub fn set_selection(&mut self, selection: Selection) {
        self.buffer = self.buffer.select(selection);
    }

    /// Whether the reference picker should open at the caret.
    pub fn should_trigger_picker(&self) -> bool {
        self.selection().is_caret()
            && self
                .detector
                .should_trigger_picker(self.text(), self.cursor())
    }

    /// The partial reference the picker should filter by, if any.
    pub fn completion_query(&self) -> Option<CompletionQuery> {
        if !self.selection().is_caret() {
            return None;
        }
        self.detector.completion_query(self.text(), self.cursor())
    }

    /// Insert a picked reference.
    ///
    /// Replaces the active completion query, or the selection when there is
    /// none, with the raw token and a trailing space. The new annotation keeps
    /// the candidate's label. Candidates that would not parse back as a
    /// reference leave the session untouched.
    pub fn insert_reference(&mut self, candidate: ReferenceCandidate) -> EditOutcome {
        let token = candidate.scheme.raw_token(&candidate.target_path);
        if self.detector.parse_token(&token).is_none() || candidate.display_text.is_empty() {
            warn!(%token, "Rejecting reference candidate");
            return EditOutcome::unchanged(self.cursor());
        }

        let range = self
            .completion_query()
            .map(|query| query.range)
            .unwrap_or_else(|| self.selection().range());
        let buffer = self.buffer.replace_range(range, &format!("{token} "));
        let annotation = Annotation::with_label(
            range.start,
            candidate.scheme,
            candidate.target_path,
            candidate.display_text,
        );
        self.apply(buffer, Some(annotation))
    }

    /// Raw/display offset map for the current version, built on first use.
    pub fn offset_map(&self) -> Arc<OffsetMap> {
        let mut cache = self.offset_map.borrow_mut();
        if let Some((version, map)) = cache.as_ref() {
            if *version == self.version {
                return Arc::clone(map);
            }
        }

        let map = Arc::new(OffsetMap::new(self.text(), &self.annotations));
        trace!(version = self.version, "Rebuilt offset map");
        *cache = Some((self.version, Arc::clone(&map)));
        map
    }

    /// The text as rendered, with references collapsed to their labels.
    pub fn display_text(&self) -> String {
        self.offset_map().display_text().to_string()
    }

    /// Caret position in display space.
    pub fn display_caret(&self) -> DisplayOffset {
        self.offset_map().to_display(RawOffset(self.cursor()))
    }

    /// Place the caret from a display position, e.g. a click.
    ///
    /// Positions inside a collapsed reference land at its raw start.
    pub fn set_caret_from_display(&mut self, offset: DisplayOffset) {
        let RawOffset(raw) = self.offset_map().to_raw(offset);
        self.set_selection(Selection::caret(raw));
    }

    /// Text for transmission, every reference written out as `@scheme://path`.
    pub fn to_wire(&self) -> String {
        wire::expand(self.text(), &self.annotations)
    }

    fn apply(&mut self, buffer: TextBuffer, inserted: Option<Annotation>) -> EditOutcome {
        let change = analyze(self.buffer.text(), buffer.text());
        if change.is_noop() && inserted.is_none() {
            self.buffer = buffer;
            return EditOutcome {
                change,
                destroyed: Vec::new(),
                created: Vec::new(),
            };
        }

        let text = buffer.text();
        let result = update(&self.annotations, &change);
        let mut annotations = sanitize(text, &result.survived);

        // Survivors that sanitizing dropped are destroyed too, reported as
        // they were before the edit.
        let mut destroyed = result.destroyed.clone();
        {
            let kept: FxHashSet<&Annotation> = annotations.iter().collect();
            let origins = survivor_origins(&self.annotations, &result);
            destroyed.extend(
                result
                    .survived
                    .iter()
                    .zip(origins)
                    .filter(|(survivor, _)| !kept.contains(survivor))
                    .map(|(_, origin)| origin.clone()),
            );
        }

        let mut created = Vec::new();
        if let Some(annotation) = inserted {
            if annotation.matches(text)
                && !annotations.iter().any(|existing| existing.overlaps(&annotation))
            {
                created.push(annotation);
            }
        }
        if self.config.auto_annotate {
            for annotation in self.detect_completed(text, &change) {
                let taken = annotations
                    .iter()
                    .chain(&created)
                    .any(|existing| existing.overlaps(&annotation));
                if !taken {
                    created.push(annotation);
                }
            }
        }
        annotations.extend(created.iter().cloned());
        annotations.sort_by_key(|annotation| annotation.range.start);

        for annotation in &destroyed {
            info!(
                path = %annotation.target_path,
                scheme = %annotation.scheme,
                "Reference removed by edit"
            );
        }
        debug!(
            start = change.start,
            old_end = change.old_end,
            inserted = change.new_len(),
            annotations = annotations.len(),
            created = created.len(),
            destroyed = destroyed.len(),
            "Applied edit"
        );

        self.buffer = buffer;
        self.annotations = annotations;
        self.version += 1;

        EditOutcome {
            change,
            destroyed,
            created,
        }
    }

    fn detect_all(&self, text: &str) -> Vec<Annotation> {
        let detected: Vec<Annotation> = self
            .detector
            .extract_references(text)
            .iter()
            .map(Annotation::from)
            .collect();
        sanitize(text, &detected)
    }

    /// References the change just completed: touched by the change and
    /// already followed by whitespace.
    fn detect_completed(&self, text: &str, change: &TextChange) -> Vec<Annotation> {
        self.detector
            .extract_references(text)
            .iter()
            .filter(|reference| {
                let range = reference.range;
                let terminated = text[range.end..].starts_with(char::is_whitespace);
                terminated && touches(change, range)
            })
            .map(Annotation::from)
            .collect()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// The input annotation each survivor in `result` was remapped from.
///
/// [`update`] keeps input order in both of its lists, so an input either is
/// the next destroyed entry or produced the next survivor.
fn survivor_origins<'a>(before: &'a [Annotation], result: &UpdateResult) -> Vec<&'a Annotation> {
    let mut destroyed = result.destroyed.iter().peekable();
    before
        .iter()
        .filter(|annotation| {
            if destroyed.peek() == Some(annotation) {
                destroyed.next();
                false
            } else {
                true
            }
        })
        .collect()
}

/// Whether the replacement text of `change` touches `range` or the character
/// right after it.
fn touches(change: &TextChange, range: TextRange) -> bool {
    change.start <= range.end && change.new_end() >= range.start
}
