//! Logging configuration for cuckoo
//!
//! All output goes to stderr so the stdout of an intercepted program is
//! never touched. An optional file receives a detailed copy of every event.

use cuckoo_core::{Error, Result};
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// How chatty the stderr output is when no explicit filter is given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Warnings and errors only (invoke mode, where cuckoo must stay invisible)
    Quiet,
    /// Informational messages (install mode)
    Normal,
    /// Debug output
    Verbose,
}

impl Verbosity {
    /// Default filter directive for this verbosity
    pub fn level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
        }
    }
}

/// Initialize the logging system
///
/// # Arguments
/// * `verbosity` - Default level when `filter` is `None`
/// * `filter` - Explicit filter directive, e.g. from `CUCKOO_LOG`
/// * `log_file` - Optional path to append logs to
///
/// # Examples
/// ```ignore
/// // Invoke mode: stay silent unless something goes wrong
/// init(Verbosity::Quiet, None, None)?;
///
/// // Install mode with a debug log file
/// init(Verbosity::Verbose, None, Some(Path::new("cuckoo.log")))?;
/// ```
pub fn init(verbosity: Verbosity, filter: Option<&str>, log_file: Option<&Path>) -> Result<()> {
    let env_filter = build_filter(verbosity, filter);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .compact()
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .with_filter(env_filter);

    let file_layer = match log_file {
        Some(log_path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(build_filter(Verbosity::Verbose, filter)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Io(std::io::Error::other(e)))
}

/// Build the filter: an explicit directive wins, otherwise the verbosity level
fn build_filter(verbosity: Verbosity, filter: Option<&str>) -> EnvFilter {
    filter
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.level()))
}
