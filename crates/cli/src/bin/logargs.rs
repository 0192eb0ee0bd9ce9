//! Diagnostic hook that logs its own argument vector
//!
//! Drop it (or a symlink to it) into a hook directory to see exactly what a
//! hook receives. Each argument is logged at INFO level to stderr and, when
//! `CUCKOO_LOG_FILE` is set, to that file.

use cuckoo_config::{Settings, Verbosity, logging};

fn main() {
    let settings = Settings::from_env();
    if let Err(e) = logging::init(
        Verbosity::Normal,
        settings.log_filter.as_deref(),
        settings.log_file.as_deref(),
    ) {
        eprintln!("cuckoo-logargs: {e}");
        std::process::exit(e.exit_code());
    }

    for (index, arg) in std::env::args_os().enumerate() {
        tracing::info!("argv[{index}] = '{}'", arg.to_string_lossy());
    }
}
