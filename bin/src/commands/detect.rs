use quill::{Config, Session};
use std::io::Write;

/// Print one line per reference: range, scheme, label and path.
pub fn run(config: Config, text: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let session = Session::with_text(config, text);
    for annotation in session.annotations() {
        writeln!(
            out,
            "{}..{}\t{}\t{}\t{}",
            annotation.start(),
            annotation.end(),
            annotation.scheme,
            annotation.display_text,
            annotation.target_path
        )?;
    }
    Ok(())
}
