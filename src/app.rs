//! Supervisor glue: gate, start, run, shut down.
//!
//! # Lifecycle
//! ```text
//! show tray ─▶ gate.resolve ─┬─ Fatal ─────────────────────────▶ exit 1
//!                            ├─ quit during setup ────────────▶ exit 0
//!                            └─ Resolved ─▶ start ─▶ Running
//!                                                      │
//!                         Quit ◀── shell.run ──▶ ServiceFailed
//!                           │                         │
//!                           ▼                         ▼
//!                 ShuttingDown: hooks (stop) ─▶ Terminated ─▶ exit 0 / 2
//! ```

use std::io;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::config::{load_config, ConfigProvider, FileConfigProvider};
use crate::error::SupervisorError;
use crate::lifecycle::signals::forward_interrupts;
use crate::lifecycle::{Lifecycle, LifecycleGate, LifecycleState};
use crate::observability::init_logging;
use crate::service::{ServiceControl, ServiceRunner, ServiceStop};
use crate::shell::console::{spawn_stdin_reader, ConsoleSetup, ConsoleTray};
use crate::shell::{
    EventLoop, SetupSurface, Shell, ShellEvent, ShellOutcome, SystemBrowser, TrayIcon, UrlOpener,
};

pub const NOT_CONFIGURED_MESSAGE: &str =
    "Exiting as search-desk is not configured. Configure the application to use it.";

/// Process exit status.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    NotConfigured = 1,
    ServiceFailed = 2,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Drive one supervisor lifetime to its exit status.
pub fn supervise<P, C, T, S, O>(
    provider: &P,
    control: &mut C,
    shell: &mut Shell<T, S, O>,
    lifecycle: &Lifecycle,
) -> ExitStatus
where
    P: ConfigProvider + ?Sized,
    C: ServiceControl,
    T: TrayIcon,
    S: SetupSurface,
    O: UrlOpener,
{
    shell.show_tray();

    let resolution = match LifecycleGate::new(provider, lifecycle.clone()).resolve(&mut *shell) {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::error!(error = %e, "Not configured");
            eprintln!("{}", NOT_CONFIGURED_MESSAGE);
            shell.notify(NOT_CONFIGURED_MESSAGE);
            return finish(shell, lifecycle, ExitStatus::NotConfigured);
        }
    };

    if shell.quit_requested() {
        tracing::info!("Quit during first-run setup, not starting the service");
        return finish(shell, lifecycle, ExitStatus::Success);
    }

    shell.set_root_url(resolution.config.root_url());
    let mut handle = match control.start(resolution.target.clone(), &resolution.config) {
        Ok(handle) => handle,
        Err(e) => {
            report_failure(&e);
            shell.notify(&format!("Service failed: {}", e));
            return finish(shell, lifecycle, ExitStatus::ServiceFailed);
        }
    };
    advance(lifecycle, LifecycleState::Running);
    shell.register_shutdown_hook("stop service", move || handle.stop());

    let status = match shell.run() {
        ShellOutcome::Quit => ExitStatus::Success,
        ShellOutcome::ServiceFailed(e) => {
            report_failure(&e);
            ExitStatus::ServiceFailed
        }
    };

    finish(shell, lifecycle, status)
}

fn finish<T, S, O>(shell: &mut Shell<T, S, O>, lifecycle: &Lifecycle, status: ExitStatus) -> ExitStatus
where
    T: TrayIcon,
    S: SetupSurface,
    O: UrlOpener,
{
    advance(lifecycle, LifecycleState::ShuttingDown);
    for e in shell.shutdown() {
        // A timed-out stop is reported; the exit still goes ahead.
        report_failure(&e);
    }
    lifecycle.terminate();
    status
}

fn report_failure(e: &SupervisorError) {
    tracing::error!(error = %e, fatal = e.is_fatal(), "Supervisor failure");
    eprintln!("search-desk: {}", e);
}

fn advance(lifecycle: &Lifecycle, next: LifecycleState) {
    if let Err(e) = lifecycle.transition(next) {
        tracing::debug!(error = %e, "Lifecycle transition skipped");
    }
}

/// Wire the console shell and the service runner, then supervise.
pub fn run(cli: Cli) -> ExitCode {
    let path = cli.config_path();
    let configured_level = load_config(&path)
        .ok()
        .map(|config| config.observability.log_level);
    init_logging(&cli.log_level(configured_level), cli.verbose);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %path.display(),
        "search-desk starting"
    );

    let provider = FileConfigProvider::new(&path, cli.overrides());
    let events = EventLoop::new();
    let proxy = events.proxy();
    let mut shell = Shell::new(
        events,
        ConsoleTray::new(io::stdout()),
        ConsoleSetup::new(&path, io::stdout()),
        SystemBrowser,
    );

    if let Err(e) = spawn_stdin_reader(proxy.clone()) {
        tracing::warn!(error = %e, "Console input unavailable");
    }
    if let Err(e) = forward_interrupts(proxy.clone()) {
        tracing::warn!(error = %e, "Signal handling unavailable");
    }

    let mut runner = ServiceRunner::new(move |event| {
        proxy.send(ShellEvent::Service(event));
    });
    let lifecycle = Lifecycle::new();

    let status = supervise(&provider, &mut runner, &mut shell, &lifecycle);
    tracing::info!(code = status.code(), state = ?lifecycle.current(), "search-desk exiting");
    status.into()
}
