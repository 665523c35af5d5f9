//! Reference schemes and their display/validation rules.
//!
//! Every scheme is a variant of the closed [`Scheme`] enum backed by a row of
//! the static [`SCHEMES`] table, so adding a scheme means adding a variant and
//! a table row and nothing else.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::{format_smolstr, SmolStr};
use snafu::Snafu;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    File,
    Http,
    Https,
    Git,
    Symbol,
}

/// Static description of one scheme.
pub struct SchemeSpec {
    pub scheme: Scheme,
    pub name: &'static str,
    pub prefix: &'static str,
    /// Short label for a path, without the leading `@`.
    pub label: fn(&str) -> &str,
    pub validate: fn(&str) -> bool,
}

/// Registration table, indexed by `Scheme as usize`.
pub static SCHEMES: [SchemeSpec; 5] = [
    SchemeSpec {
        scheme: Scheme::File,
        name: "file",
        prefix: "file://",
        label: file_label,
        validate: file_is_valid,
    },
    SchemeSpec {
        scheme: Scheme::Http,
        name: "http",
        prefix: "http://",
        label: host_label,
        validate: host_is_valid,
    },
    SchemeSpec {
        scheme: Scheme::Https,
        name: "https",
        prefix: "https://",
        label: host_label,
        validate: host_is_valid,
    },
    SchemeSpec {
        scheme: Scheme::Git,
        name: "git",
        prefix: "git://",
        label: repo_label,
        validate: repo_is_valid,
    },
    SchemeSpec {
        scheme: Scheme::Symbol,
        name: "symbol",
        prefix: "symbol://",
        label: symbol_label,
        validate: symbol_is_valid,
    },
];

impl Scheme {
    /// All schemes in default registration order.
    pub const ALL: [Scheme; 5] = [
        Scheme::File,
        Scheme::Http,
        Scheme::Https,
        Scheme::Git,
        Scheme::Symbol,
    ];

    pub fn spec(self) -> &'static SchemeSpec {
        &SCHEMES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// The `scheme://` prefix, without the leading `@`.
    pub fn prefix(self) -> &'static str {
        self.spec().prefix
    }

    /// The full raw token for `path`, e.g. `@file://src/a.kt`.
    pub fn raw_token(self, path: &str) -> String {
        format!("@{}{}", self.prefix(), path)
    }

    /// Length of `@` plus the prefix, i.e. where the path starts in a token.
    pub fn token_prefix_len(self) -> usize {
        1 + self.prefix().len()
    }

    /// The collapsed label for `path`, e.g. `@a.kt` for `src/a.kt`.
    pub fn display_text(self, path: &str) -> SmolStr {
        format_smolstr!("@{}", (self.spec().label)(path))
    }

    pub fn is_valid_path(self, path: &str) -> bool {
        (self.spec().validate)(path)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Unknown reference scheme: {name:?}"))]
pub struct ParseSchemeError {
    name: String,
}

impl FromStr for Scheme {
    type Err = ParseSchemeError;

    /// Accepts both `file` and `file://`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_suffix("://").unwrap_or(s);
        SCHEMES
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
            .map(|spec| spec.scheme)
            .ok_or_else(|| ParseSchemeSnafu { name: s }.build())
    }
}

/// Ordered set of enabled schemes. Earlier schemes win when matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeRegistry {
    schemes: SmallVec<[Scheme; 5]>,
}

impl SchemeRegistry {
    /// Registry with the given schemes; duplicates keep their first position.
    pub fn new(schemes: impl IntoIterator<Item = Scheme>) -> Self {
        let mut ordered = SmallVec::new();
        for scheme in schemes {
            if !ordered.contains(&scheme) {
                ordered.push(scheme);
            }
        }
        Self { schemes: ordered }
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    pub fn contains(&self, scheme: Scheme) -> bool {
        self.schemes.contains(&scheme)
    }

    /// First registered scheme whose prefix starts `s`.
    pub fn match_prefix(&self, s: &str) -> Option<Scheme> {
        self.schemes
            .iter()
            .copied()
            .find(|scheme| s.starts_with(scheme.prefix()))
    }

    /// True if `s` could still grow into a registered prefix (`fi`, `file:/`).
    pub fn is_partial_prefix(&self, s: &str) -> bool {
        self.schemes
            .iter()
            .any(|scheme| scheme.prefix().starts_with(s))
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::new(Scheme::ALL)
    }
}

fn last_segment<'a>(path: &'a str, separators: &[char]) -> &'a str {
    let trimmed = path.trim_end_matches(separators);
    trimmed.rsplit(separators).next().unwrap_or(trimmed)
}

fn file_label(path: &str) -> &str {
    last_segment(path, &['/', '\\'])
}

fn file_is_valid(path: &str) -> bool {
    !file_label(path).is_empty()
}

/// Host part of `user@host:port/path?query`.
fn host_label(path: &str) -> &str {
    let authority = path.split(['/', '?', '#']).next().unwrap_or(path);
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => host_port,
    }
}

fn host_is_valid(path: &str) -> bool {
    let host = host_label(path);
    !host.is_empty()
        && !host.starts_with(['.', '-'])
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

fn repo_label(path: &str) -> &str {
    let segment = last_segment(path, &['/', ':']);
    segment.strip_suffix(".git").unwrap_or(segment)
}

fn repo_is_valid(path: &str) -> bool {
    !repo_label(path).is_empty()
}

fn symbol_label(path: &str) -> &str {
    last_segment(path, &['#', ':', '/', '.'])
}

fn symbol_is_valid(path: &str) -> bool {
    !symbol_label(path).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_variant() {
        for scheme in Scheme::ALL {
            assert_eq!(scheme.spec().scheme, scheme);
        }
    }

    #[test]
    fn file_display_is_basename() {
        assert_eq!(Scheme::File.display_text("src/a.kt"), "@a.kt");
        assert_eq!(Scheme::File.display_text("README.md"), "@README.md");
        assert_eq!(Scheme::File.display_text("src/main/"), "@main");
        assert!(!Scheme::File.is_valid_path("///"));
        assert!(!Scheme::File.is_valid_path(""));
    }

    #[test]
    fn http_display_is_host() {
        assert_eq!(
            Scheme::Https.display_text("docs.rs/regex/latest"),
            "@docs.rs"
        );
        assert_eq!(
            Scheme::Http.display_text("user@localhost:8080/index.html?q=1"),
            "@localhost"
        );
        assert!(Scheme::Http.is_valid_path("example.com"));
        assert!(!Scheme::Http.is_valid_path("/no-host"));
        assert!(!Scheme::Http.is_valid_path("bad_host!/x"));
    }

    #[test]
    fn git_display_is_repo_name() {
        assert_eq!(
            Scheme::Git.display_text("github.com/user/quill.git"),
            "@quill"
        );
        assert_eq!(Scheme::Git.display_text("host:team/tools/"), "@tools");
        assert!(!Scheme::Git.is_valid_path("github.com/.git"));
    }

    #[test]
    fn symbol_display_is_last_segment() {
        assert_eq!(
            Scheme::Symbol.display_text("src/session.rs#Session::apply"),
            "@apply"
        );
        assert_eq!(Scheme::Symbol.display_text("com.example.Widget"), "@Widget");
        assert!(!Scheme::Symbol.is_valid_path("::"));
    }

    #[test]
    fn last_segment_ignores_trailing_separators() {
        assert_eq!(last_segment("a/b/c", &['/']), "c");
        assert_eq!(last_segment("a/b//", &['/']), "b");
        assert_eq!(last_segment("plain", &['/', ':']), "plain");
        assert_eq!(last_segment("///", &['/']), "");
    }

    #[test]
    fn display_never_longer_than_token() {
        let paths = ["src/a.kt", "x", "example.com", "a/b.git", "m::n"];
        for scheme in Scheme::ALL {
            for path in paths {
                assert!(scheme.display_text(path).len() <= scheme.raw_token(path).len());
            }
        }
    }

    #[test]
    fn parse_accepts_names_and_prefixes() {
        assert_eq!("file".parse::<Scheme>().ok(), Some(Scheme::File));
        assert_eq!("HTTPS://".parse::<Scheme>().ok(), Some(Scheme::Https));
        let err = "ftp".parse::<Scheme>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown reference scheme: \"ftp\"");
    }

    #[test]
    fn registry_keeps_first_occurrence_order() {
        let registry = SchemeRegistry::new([Scheme::Git, Scheme::File, Scheme::Git]);
        assert_eq!(registry.schemes(), &[Scheme::Git, Scheme::File]);
        assert_eq!(registry.match_prefix("file://x"), Some(Scheme::File));
        assert_eq!(registry.match_prefix("http://x"), None);
    }

    #[test]
    fn partial_prefixes() {
        let registry = SchemeRegistry::default();
        assert!(registry.is_partial_prefix(""));
        assert!(registry.is_partial_prefix("fi"));
        assert!(registry.is_partial_prefix("https:/"));
        assert!(!registry.is_partial_prefix("ftp"));
        assert!(!registry.is_partial_prefix("file://x"));
    }
}
