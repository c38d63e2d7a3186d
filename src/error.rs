//! Supervisor error taxonomy.
//!
//! Every failure the supervisor can observe ends up here. None of these
//! escape `app::supervise`: each is turned into a message and either a
//! lifecycle transition or a deterministic exit status.

use std::time::Duration;
use thiserror::Error;

use crate::service::BindTarget;

#[derive(Debug, Error)]
pub enum SupervisorError {
    /// No validated configuration after the first-run prompt.
    #[error("no validated configuration found")]
    ConfigurationMissing,

    /// The listener could not take ownership of its bind target.
    #[error("failed to bind {target}: {source}")]
    BindFailure {
        target: BindTarget,
        #[source]
        source: std::io::Error,
    },

    /// The service thread did not exit within the bounded wait.
    #[error("service did not stop within {0:?}")]
    ShutdownTimeout(Duration),

    /// A second live service handle was requested.
    #[error("a service instance is already running")]
    AlreadyRunning,

    #[error("failed to launch service thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to build service runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The listener failed after it was bound.
    #[error("service stopped unexpectedly: {0}")]
    Serve(#[source] std::io::Error),
}

impl SupervisorError {
    /// True for failures that end the process with a non-zero status.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SupervisorError::ShutdownTimeout(_))
    }
}
