//! Configuration presence check for the lifecycle gate.
//!
//! The gate only asks one question: is there a validated configuration right
//! now? Any failure to produce one, whether the file is missing, malformed
//! or invalid, reads as "absent".

use std::path::PathBuf;

use crate::config::loader::load_config;
use crate::config::schema::{AppConfig, ServerOverrides};

/// Source of the validated configuration.
pub trait ConfigProvider {
    /// Current configuration, or `None` when the application is unconfigured.
    fn configuration(&self) -> Option<AppConfig>;
}

/// Reads the TOML config file and applies command-line listener overrides.
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: PathBuf,
    overrides: ServerOverrides,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>, overrides: ServerOverrides) -> Self {
        Self {
            path: path.into(),
            overrides,
        }
    }
}

impl ConfigProvider for FileConfigProvider {
    fn configuration(&self) -> Option<AppConfig> {
        match load_config(&self.path) {
            Ok(mut config) => {
                config.apply_overrides(&self.overrides);
                Some(config)
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %self.path.display(), "No configuration file");
                None
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unusable configuration");
                None
            }
        }
    }
}
