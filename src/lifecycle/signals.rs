//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGINT, SIGTERM)
//! - Translate the first signal into a quit request on the foreground loop
//! - Force exit on a repeated signal
//!
//! # Design Decisions
//! - Uses Tokio's signal handling on a small dedicated thread, since the
//!   foreground loop is not async
//! - The first signal goes through the same path as the Quit menu item, so
//!   shutdown hooks still run

use std::thread::{self, JoinHandle};

use crate::shell::{ShellEvent, ShellProxy};

/// Exit status used when a second interrupt forces the process down.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Start forwarding interrupts to the foreground loop.
pub fn forward_interrupts(proxy: ShellProxy) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::error!(error = %e, "Signal handling unavailable");
                    return;
                }
            };

            runtime.block_on(async move {
                if wait_for_signal().await.is_err() {
                    return;
                }
                tracing::info!("Interrupt received, requesting quit");
                proxy.send(ShellEvent::Interrupt);

                if wait_for_signal().await.is_ok() {
                    tracing::warn!("Second interrupt received, forcing exit");
                    std::process::exit(FORCED_EXIT_CODE);
                }
            });
        })
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
