//! Bind targets and the listeners that own them.
//!
//! # Responsibilities
//! - Describe where the service listens (TCP or local socket)
//! - Bind the target and hand the listener to the HTTP server
//! - Release a socket file together with its listener
//!
//! # Design Decisions
//! - Exactly one variant per run, never both
//! - A stale socket file is removed before binding. A socket something is
//!   still listening on, or any other file at the path, surfaces as a bind
//!   failure

use std::fmt;
use std::path::PathBuf;
use tokio::net::TcpListener;

/// Resolved address form the listener serves on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindTarget {
    Tcp { host: String, port: u16 },
    UnixSocket { path: PathBuf },
}

impl fmt::Display for BindTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindTarget::Tcp { host, port } if host.contains(':') => write!(f, "[{}]:{}", host, port),
            BindTarget::Tcp { host, port } => write!(f, "{}:{}", host, port),
            BindTarget::UnixSocket { path } => write!(f, "unix:{}", path.display()),
        }
    }
}

/// A bound listener, exclusively owning its bind target.
#[derive(Debug)]
pub enum BoundListener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix {
        listener: tokio::net::UnixListener,
        socket: SocketFile,
    },
}

impl BoundListener {
    /// Human-readable local address, as reported to the shell.
    pub fn local_addr(&self) -> String {
        match self {
            BoundListener::Tcp(listener) => listener
                .local_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|_| "unknown".to_string()),
            #[cfg(unix)]
            BoundListener::Unix { socket, .. } => format!("unix:{}", socket.path.display()),
        }
    }
}

/// Bind the target.
pub async fn bind(target: &BindTarget) -> std::io::Result<BoundListener> {
    match target {
        BindTarget::Tcp { host, port } => {
            let listener = TcpListener::bind((host.as_str(), *port)).await?;
            tracing::info!(address = %listener.local_addr()?, "Listener bound");
            Ok(BoundListener::Tcp(listener))
        }
        #[cfg(unix)]
        BindTarget::UnixSocket { path } => {
            remove_stale_socket(path)?;
            let listener = tokio::net::UnixListener::bind(path)?;
            tracing::info!(path = %path.display(), "Listener bound");
            Ok(BoundListener::Unix {
                listener,
                socket: SocketFile { path: path.clone() },
            })
        }
        #[cfg(not(unix))]
        BindTarget::UnixSocket { .. } => Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "local sockets are not supported on this platform",
        )),
    }
}

#[cfg(unix)]
fn remove_stale_socket(path: &std::path::Path) -> std::io::Result<()> {
    use std::os::unix::fs::FileTypeExt;

    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_socket() => {}
        _ => return Ok(()),
    }

    // A socket that accepts a connection belongs to a live listener.
    match std::os::unix::net::UnixStream::connect(path) {
        Ok(_) => Err(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            format!("{} is in use by another listener", path.display()),
        )),
        Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => {
            tracing::debug!(path = %path.display(), "Removing stale socket file");
            std::fs::remove_file(path)
        }
        Err(e) => Err(e),
    }
}

/// Socket file removed when the listener that created it is released.
#[cfg(unix)]
#[derive(Debug)]
pub struct SocketFile {
    path: PathBuf,
}

#[cfg(unix)]
impl Drop for SocketFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove socket file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        let tcp = BindTarget::Tcp {
            host: "127.0.0.1".into(),
            port: 8000,
        };
        assert_eq!(tcp.to_string(), "127.0.0.1:8000");

        let v6 = BindTarget::Tcp {
            host: "::1".into(),
            port: 8000,
        };
        assert_eq!(v6.to_string(), "[::1]:8000");

        let unix = BindTarget::UnixSocket {
            path: PathBuf::from("/run/desk.sock"),
        };
        assert_eq!(unix.to_string(), "unix:/run/desk.sock");
    }

    #[tokio::test]
    async fn tcp_bind_reports_address() {
        let target = BindTarget::Tcp {
            host: "127.0.0.1".into(),
            port: 0,
        };
        let listener = bind(&target).await.unwrap();
        let addr: std::net::SocketAddr = listener.local_addr().parse().unwrap();
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn occupied_port_fails() {
        let held = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let target = BindTarget::Tcp {
            host: "127.0.0.1".into(),
            port: held.local_addr().unwrap().port(),
        };
        assert!(bind(&target).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn socket_file_follows_listener() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.sock");
        let target = BindTarget::UnixSocket { path: path.clone() };

        let listener = bind(&target).await.unwrap();
        assert!(path.exists());
        drop(listener);
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stale_socket_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.sock");
        drop(std::os::unix::net::UnixListener::bind(&path).unwrap());
        assert!(path.exists());

        let target = BindTarget::UnixSocket { path: path.clone() };
        let listener = bind(&target).await.unwrap();
        assert_eq!(listener.local_addr(), format!("unix:{}", path.display()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn live_socket_is_not_taken_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.sock");
        let _owner = std::os::unix::net::UnixListener::bind(&path).unwrap();

        let target = BindTarget::UnixSocket { path: path.clone() };
        let err = bind(&target).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
        assert!(path.exists());
        assert!(std::os::unix::net::UnixStream::connect(&path).is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn regular_file_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.sock");
        std::fs::write(&path, "keep me").unwrap();

        let target = BindTarget::UnixSocket { path: path.clone() };
        assert!(bind(&target).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }
}
