//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the desktop
//! shell and the service it supervises. All types derive Serde traits for
//! deserialization from the TOML config file.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::service::BindTarget;

/// Root URL opened when the service has no browser-reachable address.
pub const DEFAULT_ROOT_URL: &str = "http://localhost:8000/";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where and how the service listens.
    pub server: ServerConfig,

    /// Content types offered for search.
    pub content: ContentConfig,

    /// Shutdown behaviour of the supervised service.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Service listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind when serving over TCP.
    pub host: String,

    /// Port to bind when serving over TCP.
    pub port: u16,

    /// Local socket path. Takes precedence over host/port when set.
    pub socket: Option<PathBuf>,

    /// URL opened by the "Search" menu item, if the bind address is not it.
    pub public_url: Option<String>,

    /// Directory served under `/static`.
    pub static_dir: Option<PathBuf>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            socket: None,
            public_url: None,
            static_dir: None,
            request_timeout_secs: 30,
        }
    }
}

/// Content types. A type is enabled when its section is present.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    pub org: Option<ContentSource>,
    pub markdown: Option<ContentSource>,
    pub ledger: Option<ContentSource>,
    pub image: Option<ContentSource>,
}

impl ContentConfig {
    /// Enabled content types with their display names, in menu order.
    pub fn enabled(&self) -> Vec<(&'static str, &ContentSource)> {
        [
            ("Org-Mode", &self.org),
            ("Markdown", &self.markdown),
            ("Beancount", &self.ledger),
            ("Image", &self.image),
        ]
        .into_iter()
        .filter_map(|(name, source)| source.as_ref().map(|s| (name, s)))
        .collect()
    }
}

/// Directories indexed for one content type.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ContentSource {
    pub directories: Vec<PathBuf>,
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Upper bound on waiting for the service to release its bind target.
    pub timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Listener settings supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub socket: Option<PathBuf>,
}

impl AppConfig {
    /// The bind target this configuration resolves to.
    pub fn bind_target(&self) -> BindTarget {
        match &self.server.socket {
            Some(path) => BindTarget::UnixSocket { path: path.clone() },
            None => BindTarget::Tcp {
                host: self.server.host.clone(),
                port: self.server.port,
            },
        }
    }

    /// Apply command-line overrides. An explicit host or port selects TCP.
    pub fn apply_overrides(&mut self, overrides: &ServerOverrides) {
        if let Some(host) = &overrides.host {
            self.server.host = host.clone();
            self.server.socket = None;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
            self.server.socket = None;
        }
        if let Some(socket) = &overrides.socket {
            self.server.socket = Some(socket.clone());
        }
    }

    /// URL of the service's root page as seen from a local browser.
    pub fn root_url(&self) -> String {
        if let Some(url) = &self.server.public_url {
            return url.clone();
        }
        match self.bind_target() {
            BindTarget::Tcp { host, port } => format!("http://{}:{}/", browser_host(&host), port),
            BindTarget::UnixSocket { .. } => DEFAULT_ROOT_URL.to_string(),
        }
    }
}

fn browser_host(host: &str) -> String {
    match host.parse::<IpAddr>() {
        Ok(ip) if ip.is_unspecified() => "localhost".to_string(),
        Ok(IpAddr::V6(ip)) => format!("[{}]", ip),
        _ => host.to_string(),
    }
}
