//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → provider.rs (apply CLI overrides, absent on any failure)
//!     → AppConfig (validated, immutable)
//!     → lifecycle gate decides whether the service may start
//!
//! Setup surface:
//!     user input → AppConfig → validation.rs → loader.rs (save)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved; edits apply on next launch
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod provider;
pub mod schema;
pub mod validation;

pub use loader::{load_config, save_config, ConfigError};
pub use provider::{ConfigProvider, FileConfigProvider};
pub use schema::{AppConfig, ContentConfig, ContentSource, ServerConfig, ServerOverrides};
