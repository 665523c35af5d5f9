//! Replay a sequence of text snapshots through a session.
//!
//! The input is a TOML file:
//!
//! ```toml
//! snapshots = [
//!     "see @file://src/a.kt ",
//!     "see @file://src/a.kt for details",
//!     "see @file:/a.kt for details",
//! ]
//! ```
//!
//! Each snapshot replaces the session text with the caret at its end, the way
//! a text field reports edits.

use anyhow::Context;
use quill::{Annotation, Config, EditOutcome, Selection, Session};
use serde::Deserialize;
use std::{io::Write, path::Path};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Replay {
    pub snapshots: Vec<String>,
}

impl Replay {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse replay file: {}", path.display()))
    }
}

pub fn run(config: Config, path: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let replay = Replay::load(path)?;
    debug!(snapshots = replay.snapshots.len(), "Replaying");

    let mut session = Session::new(config);
    for (step, snapshot) in replay.snapshots.iter().enumerate() {
        let outcome = session.set_text(snapshot.as_str(), Selection::caret(snapshot.len()));
        write_outcome(out, step, &outcome)?;
    }
    writeln!(out, "display: {}", session.display_text())?;
    Ok(())
}

fn write_outcome(out: &mut impl Write, step: usize, outcome: &EditOutcome) -> anyhow::Result<()> {
    let change = &outcome.change;
    writeln!(
        out,
        "#{step} replace {}..{} with {:?}",
        change.start, change.old_end, change.new_text
    )?;
    for annotation in &outcome.created {
        writeln!(out, "  + {}", describe(annotation))?;
    }
    for annotation in &outcome.destroyed {
        writeln!(out, "  - {}", describe(annotation))?;
    }
    Ok(())
}

fn describe(annotation: &Annotation) -> String {
    format!(
        "{}..{} {}",
        annotation.start(),
        annotation.end(),
        annotation.raw_text()
    )
}
