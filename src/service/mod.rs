//! Supervised network service.
//!
//! # Data Flow
//! ```text
//! BindTarget (from config)
//!     → runner.rs (spawn service thread, own the handle)
//!     → bind.rs (TCP or local socket listener)
//!     → server.rs (Axum app, graceful shutdown on signal)
//!
//! Service thread → ServiceEvent (Started / Failed / Exited) → shell
//! ```
//!
//! # Design Decisions
//! - One foreground loop, one service thread; nothing else runs concurrently
//! - Stop is cooperative: a broadcast signal, then a bounded join

pub mod bind;
pub mod runner;
pub mod server;

pub use bind::{BindTarget, BoundListener};
pub use runner::{ServiceControl, ServiceEvent, ServiceHandle, ServiceRunner, ServiceStop};
pub use server::HttpServer;
