//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (gate.rs):
//!     Query config → [first-run setup → re-query once] → bind target or fatal
//!
//! State (state.rs):
//!     Unconfigured → Configured → Running → ShuttingDown → Terminated
//!
//! Shutdown (shutdown.rs):
//!     Quit → run hooks (stop service, wait bounded) → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Quit request on the foreground loop
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then the service thread
//! - Ordered shutdown: hooks run before the process may exit
//! - Shutdown has timeout: a stuck service is reported, not waited on forever

pub mod gate;
pub mod shutdown;
pub mod signals;
pub mod state;

pub use gate::{FirstRun, LifecycleGate, Resolution};
pub use shutdown::{Shutdown, ShutdownHooks};
pub use state::{Lifecycle, LifecycleState, TransitionError};
