//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Derive the filter from `RUST_LOG`, the config and `-v` flags

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level after applying `verbose` bumps (`-v` → debug, `-vv` → trace).
pub fn effective_level(level: &str, verbose: u8) -> &str {
    match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    }
}

/// Default directives when `RUST_LOG` is unset.
pub fn default_directives(level: &str) -> String {
    format!("search_desk={level},tower_http={level}")
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(level: &str, verbose: u8) {
    let level = effective_level(level, verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if installed.is_err() {
        tracing::debug!("Logging already initialized");
    }
}
