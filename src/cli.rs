//! Command-line interface.

use clap::Parser;
use std::path::PathBuf;

use crate::config::ServerOverrides;

/// Directory name under the platform config dir.
pub const APP_DIR: &str = "search-desk";

#[derive(Debug, Parser)]
#[command(name = "search-desk")]
#[command(about = "Desktop shell that supervises the local search service", long_about = None)]
pub struct Cli {
    /// Config file to read and write
    #[arg(short = 'c', long)]
    pub config_file: Option<PathBuf>,

    /// Host to serve on (implies TCP)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to serve on (implies TCP)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Serve on a local socket instead of TCP
    #[arg(long, conflicts_with_all = ["host", "port"])]
    pub socket: Option<PathBuf>,

    /// Log level; defaults to the config file's, then "info"
    #[arg(long, value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: Option<String>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Explicit `--config-file`, else `<config dir>/search-desk/config.toml`.
    pub fn config_path(&self) -> PathBuf {
        if let Some(path) = &self.config_file {
            return path.clone();
        }
        match dirs::config_dir() {
            Some(dir) => dir.join(APP_DIR).join("config.toml"),
            None => PathBuf::from("search-desk.toml"),
        }
    }

    pub fn overrides(&self) -> ServerOverrides {
        ServerOverrides {
            host: self.host.clone(),
            port: self.port,
            socket: self.socket.clone(),
        }
    }

    pub fn log_level(&self, configured: Option<String>) -> String {
        self.log_level
            .clone()
            .or(configured)
            .unwrap_or_else(|| "info".to_string())
    }
}
