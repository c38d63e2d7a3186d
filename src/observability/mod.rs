//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! shell, lifecycle, service thread
//!     → tracing events (structured fields)
//!     → logging.rs subscriber (stderr, EnvFilter)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so the console tray owns stdout
//! - `RUST_LOG` wins over the configured level

pub mod logging;

pub use logging::init_logging;
