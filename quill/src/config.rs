//! Configuration management for Quill.
//!
//! Loads a `config.toml` from an explicit path, falling back to the defaults
//! embedded from the workspace root `config.toml`.
//!
//! # Architecture
//!
//! 1. The host decides where a config file may live (CLI flag, project dir)
//! 2. [`Config::load_with_overrides`] picks the config path: CLI override > discovered > defaults
//! 3. The [`Config`] is passed to [`crate::Session::new`]
//!
//! # Testing
//!
//! Tests use [`Config::load()`] with explicit paths to temporary directories.

use anyhow::{Context, Result};
use quill_reference::{Detector, Scheme, SchemeRegistry};
use serde::Deserialize;
use std::path::Path;

/// Engine configuration, loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Enabled reference schemes, in match order.
    ///
    /// An empty list disables reference detection entirely.
    pub schemes: Vec<Scheme>,

    /// Whether typed references become annotations once followed by whitespace.
    pub auto_annotate: bool,

    /// Whether backspace at the end of a reference deletes the whole token.
    pub atomic_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schemes: Scheme::ALL.to_vec(),
            auto_annotate: true,
            atomic_delete: true,
        }
    }
}

impl Config {
    /// Read and deserialize a TOML config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration with priority: CLI override > discovered path > defaults.
    pub fn load_with_overrides(
        cli_override: Option<&Path>,
        discovered_path: Option<&Path>,
    ) -> Result<Self> {
        if let Some(path) = cli_override {
            return Self::load(path);
        }
        if let Some(path) = discovered_path {
            return Self::load(path);
        }
        Self::load_embedded()
    }

    fn load_embedded() -> Result<Self> {
        let source = include_str!("../../config.toml");
        toml::from_str(source).context("Failed to parse embedded config.toml")
    }

    pub fn registry(&self) -> SchemeRegistry {
        SchemeRegistry::new(self.schemes.iter().copied())
    }

    pub fn detector(&self) -> Detector {
        Detector::new(self.registry())
    }
}
