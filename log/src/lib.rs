//! Logging setup for Quill with file output and optional stdout.
//!
//! Logs always go to a file at `warn` level (or higher if a filter is set).
//! Stdout logging is enabled when `QUILL_LOG` or `RUST_LOG` is set, or in debug builds.
//!
//! ## Environment Variables
//!
//! 1. **`QUILL_LOG`** (highest priority) - Quill-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for quill crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/quill/logs/quill-<pid>.log`
//! - macOS: `~/Library/Application Support/quill/logs/quill-12345.log`
//! - Linux: `~/.local/share/quill/logs/quill-12345.log`
//!
//! Override with `--log-file <path>` or `QUILL_LOG_FILE`.

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Crates whose level follows a bare `QUILL_LOG=<level>`.
const QUILL_CRATES: &[&str] = &[
    "quill",
    "quill_bin",
    "quill_text",
    "quill_reference",
    "quill_annotation",
    "quill_text_transform",
];

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Default, Clone)]
pub struct LogConfig {
    /// A file path, or a directory to place the default file name in.
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// This function respects the environment variable priority described in the module docs:
/// [`QUILL_LOG`] > [`RUST_LOG`] > default settings.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program.
/// Dropping it flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let override_path = config
        .log_file_path
        .or_else(|| env::var_os("QUILL_LOG_FILE").map(PathBuf::from));
    let (log_dir, filename) = resolve_log_path(override_path);

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_file_filter());

    let stdout_enabled =
        env::var("QUILL_LOG").is_ok() || env::var("RUST_LOG").is_ok() || cfg!(debug_assertions);

    let stdout_layer = if stdout_enabled {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(create_filter()),
        )
    } else {
        None
    };

    Registry::default()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Stdout only, through the test writer so output is captured per test.
/// Safe to call from every test; later calls are no-ops.
pub fn test() {
    let _ = fmt()
        .with_env_filter(create_filter())
        .with_test_writer()
        .try_init();
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("quill-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir.to_path_buf(), name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quill")
        .join("logs");

    (dir, filename)
}

/// File filter: uses user-specified level if set, otherwise defaults to `warn`.
fn create_file_filter() -> EnvFilter {
    if env::var("QUILL_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
        return create_filter();
    }
    EnvFilter::new("warn")
}

/// Create the [`EnvFilter`] for the priority [`QUILL_LOG`] > [`RUST_LOG`] > defaults.
fn create_filter() -> EnvFilter {
    if let Ok(quill_log) = env::var("QUILL_LOG") {
        return expand_quill_log(&quill_log);
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }

    EnvFilter::new(crate_directives("info"))
}

/// Expand [`QUILL_LOG`] values into full tracing filter strings.
///
/// - `QUILL_LOG=debug` becomes `warn,quill=debug,quill_text=debug,...`
/// - `QUILL_LOG=quill_annotation=trace,quill=debug` is used as-is
fn expand_quill_log(quill_log: &str) -> EnvFilter {
    if is_directive_syntax(quill_log) {
        return EnvFilter::new(quill_log);
    }
    EnvFilter::new(crate_directives(quill_log))
}

fn is_directive_syntax(value: &str) -> bool {
    value.contains('=') || value.contains(':') || value.contains(',')
}

fn crate_directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for name in QUILL_CRATES {
        directives.push(',');
        directives.push_str(name);
        directives.push('=');
        directives.push_str(level);
    }
    directives
}
