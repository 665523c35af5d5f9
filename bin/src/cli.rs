use clap::Parser;
use std::path::PathBuf;

/// Command-line interface configuration
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file, overriding the built-in defaults
    #[arg(long, global = true, env = "QUILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path or directory
    #[arg(long, global = true, env = "QUILL_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// List the references found in TEXT
    Detect { text: String },
    /// Print TEXT with every reference collapsed to its label
    Collapse { text: String },
    /// Feed the text snapshots of a TOML file through a session
    Replay { file: PathBuf },
}
