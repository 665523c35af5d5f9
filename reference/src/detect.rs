//! Reference detection in raw input text.
//!
//! A reference token is `@` followed by a registered scheme prefix and a
//! non-empty run of non-whitespace characters. The token must start the text
//! or follow whitespace:
//!
//! ```text
//! see @file://src/a.kt and @https://docs.rs/regex
//!     ^^^^^^^^^^^^^^^^     ^^^^^^^^^^^^^^^^^^^^^^
//! mail@file://x.rs          <- not a reference, `@` is not at a word start
//! ```
//!
//! Detection also drives the reference picker: [`Detector::should_trigger_picker`]
//! fires on a freshly typed bare `@`, and [`Detector::completion_query`] returns
//! the partial token the picker filters by until a complete reference exists.

use crate::scheme::{Scheme, SchemeRegistry};
use quill_text::{clip_offset, TextRange};
use regex::Regex;
use smol_str::SmolStr;
use std::sync::LazyLock;
use tracing::{trace, warn};

/// A reference token found in text. Transient, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedReference {
    /// The whole token, e.g. `@file://src/a.kt`.
    pub full_match_text: String,
    pub scheme: Scheme,
    /// Everything after the scheme prefix, e.g. `src/a.kt`.
    pub path: String,
    pub range: TextRange,
}

impl ExtractedReference {
    pub fn display_text(&self) -> SmolStr {
        self.scheme.display_text(&self.path)
    }
}

/// Partial reference under the caret that the picker should complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionQuery {
    /// Range of the partial token including its `@`, ending at the caret.
    pub range: TextRange,
    /// Scheme, once its prefix has been typed completely.
    pub scheme: Option<Scheme>,
    /// Filter text: the token after `@`, or after the prefix when `scheme` is known.
    pub query: String,
}

/// Scheme-aware reference scanner.
#[derive(Debug, Clone)]
pub struct Detector {
    registry: SchemeRegistry,
    pattern: Option<Regex>,
}

impl Detector {
    pub fn new(registry: SchemeRegistry) -> Self {
        let pattern = build_pattern(&registry);
        Self { registry, pattern }
    }

    pub fn registry(&self) -> &SchemeRegistry {
        &self.registry
    }

    /// All references in `text`, in order and non-overlapping.
    ///
    /// Tokens whose path fails the scheme's validation rule are skipped.
    pub fn extract_references(&self, text: &str) -> Vec<ExtractedReference> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        let mut references = Vec::new();
        for caps in pattern.captures_iter(text) {
            let (Some(token), Some(prefix), Some(path)) = (caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };
            let Some(scheme) = self.registry.match_prefix(prefix.as_str()) else {
                continue;
            };
            if !scheme.is_valid_path(path.as_str()) {
                trace!(token = token.as_str(), %scheme, "Skipping invalid reference");
                continue;
            }
            references.push(ExtractedReference {
                full_match_text: token.as_str().to_string(),
                scheme,
                path: path.as_str().to_string(),
                range: TextRange::new(token.start(), token.end()),
            });
        }
        references
    }

    /// Parse `token` as one complete reference, e.g. `@git://host/repo.git`.
    pub fn parse_token(&self, token: &str) -> Option<(Scheme, String)> {
        let rest = token.strip_prefix('@')?;
        let scheme = self.registry.match_prefix(rest)?;
        let path = &rest[scheme.prefix().len()..];
        if path.is_empty() || path.contains(char::is_whitespace) || !scheme.is_valid_path(path) {
            return None;
        }
        Some((scheme, path.to_string()))
    }

    /// The reference whose range contains `offset`, end inclusive.
    pub fn reference_at(&self, text: &str, offset: usize) -> Option<ExtractedReference> {
        self.extract_references(text)
            .into_iter()
            .find(|reference| reference.range.start <= offset && offset <= reference.range.end)
    }

    /// True when the caret directly follows a bare `@` at a word start.
    ///
    /// Does not fire when the text after the caret already continues into a
    /// registered prefix, so moving the caret inside an existing reference
    /// never reopens the picker.
    pub fn should_trigger_picker(&self, text: &str, cursor: usize) -> bool {
        let cursor = clip_offset(text, cursor);
        let before = &text[..cursor];
        let Some(at) = before.strip_suffix('@') else {
            return false;
        };
        if !at.chars().next_back().map_or(true, char::is_whitespace) {
            return false;
        }
        self.registry.match_prefix(&text[cursor..]).is_none()
    }

    /// The partial reference ending at `cursor`, if the picker should offer
    /// completions for it.
    ///
    /// Returns `None` when the caret is not inside an `@` token, when the token
    /// cannot grow into a registered prefix, or once it is a complete reference.
    pub fn completion_query(&self, text: &str, cursor: usize) -> Option<CompletionQuery> {
        let cursor = clip_offset(text, cursor);
        let start = token_start(text, cursor);
        let token_end = token_end(text, cursor);

        let partial = &text[start..cursor];
        let typed = partial.strip_prefix('@')?;

        if self.parse_token(&text[start..token_end]).is_some() {
            return None;
        }

        let range = TextRange::new(start, cursor);
        if let Some(scheme) = self.registry.match_prefix(typed) {
            let path = &typed[scheme.prefix().len()..];
            if !path.is_empty() {
                return None;
            }
            return Some(CompletionQuery {
                range,
                scheme: Some(scheme),
                query: String::new(),
            });
        }

        // Bare words after `@` still filter the picker, e.g. `@READ`.
        if self.registry.is_partial_prefix(typed) || !typed.contains("://") {
            return Some(CompletionQuery {
                range,
                scheme: None,
                query: typed.to_string(),
            });
        }
        None
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(SchemeRegistry::default())
    }
}

static DEFAULT_DETECTOR: LazyLock<Detector> = LazyLock::new(Detector::default);

/// [`Detector::extract_references`] with every scheme enabled.
pub fn extract_references(text: &str) -> Vec<ExtractedReference> {
    DEFAULT_DETECTOR.extract_references(text)
}

/// [`Detector::should_trigger_picker`] with every scheme enabled.
pub fn should_trigger_picker(text: &str, cursor: usize) -> bool {
    DEFAULT_DETECTOR.should_trigger_picker(text, cursor)
}

/// [`Detector::completion_query`] with every scheme enabled.
pub fn completion_query(text: &str, cursor: usize) -> Option<CompletionQuery> {
    DEFAULT_DETECTOR.completion_query(text, cursor)
}

fn build_pattern(registry: &SchemeRegistry) -> Option<Regex> {
    if registry.is_empty() {
        return None;
    }
    let prefixes = registry
        .schemes()
        .iter()
        .map(|scheme| regex::escape(scheme.prefix()))
        .collect::<Vec<_>>()
        .join("|");
    // Alternation is leftmost-first, so registration order decides ties.
    match Regex::new(&format!(r"(?:^|\s)(@({prefixes})(\S+))")) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            warn!("Failed to compile reference pattern: {e}");
            None
        },
    }
}

fn token_start(text: &str, cursor: usize) -> usize {
    text[..cursor]
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map_or(0, |(idx, ch)| idx + ch.len_utf8())
}

fn token_end(text: &str, cursor: usize) -> usize {
    text[cursor..]
        .find(char::is_whitespace)
        .map_or(text.len(), |idx| cursor + idx)
}
