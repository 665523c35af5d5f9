use anyhow::Context;
use clap::Parser;
use quill::Config;
use quill_bin::{
    cli::{Cli, Command},
    commands,
};
use quill_log::LogConfig;

fn main() {
    let cli = Cli::parse();

    let _log_guard = match quill_log::init(LogConfig {
        log_file_path: cli.log_file.clone(),
    }) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {e}");
            None
        },
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config =
        Config::load_with_overrides(cli.config.as_deref(), None).context("Failed to load config")?;

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Detect { text } => commands::detect::run(config, &text, &mut stdout),
        Command::Collapse { text } => commands::collapse::run(config, &text, &mut stdout),
        Command::Replay { file } => commands::replay::run(config, &file, &mut stdout),
    }
}
