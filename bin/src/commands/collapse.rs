use quill::{Config, Session};
use std::io::Write;

pub fn run(config: Config, text: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let session = Session::with_text(config, text);
    writeln!(out, "{}", session.display_text())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_references() {
        let mut out = Vec::new();
        run(Config::default(), "see @file://src/a.kt for details", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "see @a.kt for details\n");
    }
}
