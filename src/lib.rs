//! search-desk
//!
//! Desktop shell that supervises a local search service.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────── foreground thread ────────────────────────┐
//!   │                                                                    │
//!   │  tray (Search / Configure / Quit) ──▶ shell event loop ◀── stdin   │
//!   │                                         │        ▲                 │
//!   │                        lifecycle gate ◀─┘        │ ServiceEvent    │
//!   │                        (config or first run)     │                 │
//!   └──────────────────────────────────────────────────┼─────────────────┘
//!                                                      │
//!   ┌──────────────────────── service thread ──────────┴─────────────────┐
//!   │  tokio runtime ─▶ bind (TCP / local socket) ─▶ axum router         │
//!   │                     ▲                                              │
//!   │                     └── Shutdown broadcast (stop on Quit)          │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod service;
pub mod shell;
pub mod tray;

pub use app::{supervise, ExitStatus};
pub use config::schema::AppConfig;
pub use error::SupervisorError;
pub use lifecycle::{Lifecycle, LifecycleState, Shutdown};
pub use service::{BindTarget, HttpServer, ServiceRunner};
