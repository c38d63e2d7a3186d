//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the listener target is usable
//! - Require at least one searchable content type
//! - Validate value ranges (timeouts > 0, known log levels)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure apart from checking the socket's parent directory
//! - Runs before a configuration is handed to the supervisor

use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.host must not be empty")]
    EmptyHost,
    #[error("server.port must be between 1 and 65535")]
    ZeroPort,
    #[error("server.socket must not be empty")]
    EmptySocketPath,
    #[error("directory for server.socket does not exist: {0}")]
    MissingSocketDir(String),
    #[error("server.public_url is not an http(s) URL: {0}")]
    InvalidPublicUrl(String),
    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,
    #[error("shutdown.timeout_secs must be greater than zero")]
    ZeroShutdownTimeout,
    #[error("no content type is enabled")]
    NoContent,
    #[error("content.{0} has an empty directory entry")]
    EmptyDirectory(&'static str),
    #[error("unknown observability.log_level: {0}")]
    UnknownLogLevel(String),
}

/// Check a parsed configuration, collecting every violation.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let server = &config.server;

    match &server.socket {
        Some(path) if path.as_os_str().is_empty() => errors.push(ValidationError::EmptySocketPath),
        Some(path) => {
            let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
            if let Some(dir) = parent {
                if !dir.is_dir() {
                    errors.push(ValidationError::MissingSocketDir(dir.display().to_string()));
                }
            }
        }
        None => {
            if server.host.trim().is_empty() {
                errors.push(ValidationError::EmptyHost);
            }
            if server.port == 0 {
                errors.push(ValidationError::ZeroPort);
            }
        }
    }

    if let Some(raw) = &server.public_url {
        let valid = Url::parse(raw)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidPublicUrl(raw.clone()));
        }
    }

    if server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.shutdown.timeout_secs == 0 {
        errors.push(ValidationError::ZeroShutdownTimeout);
    }

    let content = [
        ("org", &config.content.org),
        ("markdown", &config.content.markdown),
        ("ledger", &config.content.ledger),
        ("image", &config.content.image),
    ];
    let mut searchable = false;
    for (name, source) in content {
        let Some(source) = source else { continue };
        if source.directories.iter().any(|d| d.as_os_str().is_empty()) {
            errors.push(ValidationError::EmptyDirectory(name));
        }
        searchable |= source.directories.iter().any(|d| !d.as_os_str().is_empty());
    }
    if !searchable {
        errors.push(ValidationError::NoContent);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
