//! Background execution unit hosting the listener.
//!
//! # Responsibilities
//! - Launch exactly one service thread per start, with its own Tokio runtime
//! - Report bind/serve outcomes asynchronously to whoever supervises
//! - Stop cooperatively and wait, bounded, for the bind target to be released
//!
//! # Design Decisions
//! - `start` is fire-and-forget: bind failures arrive as events, not returns
//! - The live handle is the only owner of the bind target; a second start
//!   while one is live is refused
//! - `stop` is idempotent and never hangs the caller past the timeout

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::SupervisorError;
use crate::lifecycle::Shutdown;
use crate::service::bind::{bind, BindTarget};
use crate::service::server::HttpServer;

/// Outcome notifications from the service thread.
#[derive(Debug)]
pub enum ServiceEvent {
    /// Listener bound and serving.
    Started {
        target: BindTarget,
        local_addr: String,
    },
    /// Start attempt or serving failed. Never retried.
    Failed(SupervisorError),
    /// The service thread finished.
    Exited,
}

type Reporter = Arc<dyn Fn(ServiceEvent) + Send + Sync>;

/// Something that can launch the service.
pub trait ServiceControl {
    type Handle: ServiceStop + Send + 'static;

    fn start(&mut self, target: BindTarget, config: &AppConfig)
        -> Result<Self::Handle, SupervisorError>;
}

/// Ownership token for a running service.
pub trait ServiceStop {
    /// Stop and wait for release. Calling it again is a no-op.
    fn stop(&mut self) -> Result<(), SupervisorError>;

    fn is_running(&self) -> bool;
}

/// Launches the HTTP service on a dedicated thread.
pub struct ServiceRunner {
    reporter: Reporter,
    live: Arc<AtomicBool>,
}

impl ServiceRunner {
    pub fn new<F>(reporter: F) -> Self
    where
        F: Fn(ServiceEvent) + Send + Sync + 'static,
    {
        Self {
            reporter: Arc::new(reporter),
            live: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True while a service thread holds the bind target.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Stop the service owned by `handle`.
    pub fn stop(&self, handle: &mut ServiceHandle) -> Result<(), SupervisorError> {
        handle.stop()
    }
}

impl ServiceControl for ServiceRunner {
    type Handle = ServiceHandle;

    fn start(
        &mut self,
        target: BindTarget,
        config: &AppConfig,
    ) -> Result<ServiceHandle, SupervisorError> {
        if self
            .live
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SupervisorError::AlreadyRunning);
        }

        let shutdown = Shutdown::new();
        let stop_rx = shutdown.subscribe();
        let (exited_tx, exited_rx) = mpsc::channel();
        let server = HttpServer::new(config);
        let reporter = self.reporter.clone();
        let live = self.live.clone();
        let thread_target = target.clone();

        let spawned = thread::Builder::new()
            .name("service".into())
            .spawn(move || {
                let _exit = ExitNotice {
                    live,
                    exited: exited_tx,
                };
                serve_until_stopped(thread_target, server, stop_rx, reporter.as_ref());
                reporter(ServiceEvent::Exited);
            });

        let thread = match spawned {
            Ok(thread) => thread,
            Err(e) => {
                self.live.store(false, Ordering::SeqCst);
                return Err(SupervisorError::Spawn(e));
            }
        };

        tracing::info!(bind = %target, "Service thread launched");
        Ok(ServiceHandle {
            inner: Some(Running {
                target,
                shutdown,
                exited: exited_rx,
                thread,
            }),
            timeout: Duration::from_secs(config.shutdown.timeout_secs),
        })
    }
}

fn serve_until_stopped(
    target: BindTarget,
    server: HttpServer,
    stop_rx: tokio::sync::broadcast::Receiver<()>,
    report: &(dyn Fn(ServiceEvent) + Send + Sync),
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("service-worker")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            report(ServiceEvent::Failed(SupervisorError::Runtime(e)));
            return;
        }
    };

    runtime.block_on(async move {
        let listener = match bind(&target).await {
            Ok(listener) => listener,
            Err(source) => {
                tracing::error!(bind = %target, error = %source, "Bind failed");
                report(ServiceEvent::Failed(SupervisorError::BindFailure { target, source }));
                return;
            }
        };

        report(ServiceEvent::Started {
            target: target.clone(),
            local_addr: listener.local_addr(),
        });

        if let Err(e) = server.run(listener, stop_rx).await {
            tracing::error!(bind = %target, error = %e, "Service failed");
            report(ServiceEvent::Failed(SupervisorError::Serve(e)));
        }
    });
}

/// Clears the live flag and wakes `stop` when the service thread ends,
/// including by panic.
struct ExitNotice {
    live: Arc<AtomicBool>,
    exited: mpsc::Sender<()>,
}

impl Drop for ExitNotice {
    fn drop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        let _ = self.exited.send(());
    }
}

struct Running {
    target: BindTarget,
    shutdown: Shutdown,
    exited: mpsc::Receiver<()>,
    thread: JoinHandle<()>,
}

/// Live ownership token for one service thread.
///
/// Inert once stopped; a later start produces a fresh handle.
pub struct ServiceHandle {
    inner: Option<Running>,
    timeout: Duration,
}

impl ServiceHandle {
    /// A handle that never started. Stopping it is a no-op.
    pub fn inert() -> Self {
        Self {
            inner: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn target(&self) -> Option<&BindTarget> {
        self.inner.as_ref().map(|running| &running.target)
    }
}

impl ServiceStop for ServiceHandle {
    fn stop(&mut self) -> Result<(), SupervisorError> {
        let Some(running) = self.inner.take() else {
            return Ok(());
        };

        tracing::info!(bind = %running.target, "Stopping service");
        running.shutdown.trigger();

        match running.exited.recv_timeout(self.timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if running.thread.join().is_err() {
                    tracing::error!(bind = %running.target, "Service thread panicked");
                }
                tracing::info!(bind = %running.target, "Service stopped");
                Ok(())
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::error!(
                    bind = %running.target,
                    timeout = ?self.timeout,
                    "Service did not stop in time, detaching"
                );
                Err(SupervisorError::ShutdownTimeout(self.timeout))
            }
        }
    }

    fn is_running(&self) -> bool {
        self.inner
            .as_ref()
            .map(|running| !running.thread.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        if let Some(running) = &self.inner {
            tracing::warn!(bind = %running.target, "Service handle dropped while live, signalling stop");
            running.shutdown.trigger();
        }
    }
}

impl std::fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("target", &self.target())
            .field("timeout", &self.timeout)
            .finish()
    }
}
