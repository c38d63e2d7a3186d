//! Application shell: the single foreground event loop.
//!
//! # Data Flow
//! ```text
//! stdin reader ─┐
//! signals ──────┼─▶ ShellProxy ─▶ EventLoop ─▶ Shell::handle
//! service ──────┘                                 │
//!                       ┌─────────────────────────┼──────────────────┐
//!                       ▼                         ▼                  ▼
//!              TrayController            SetupSurface          ServiceEvent
//!         (Search/Configure/Quit)     (first run, reconfig)   (started/failed)
//! ```
//!
//! # Design Decisions
//! - Surfaces are traits; the console renditions live in `console.rs`
//! - The first-run wait pumps this same loop, so the surface it waits on
//!   keeps receiving input
//! - Quit sets a flag and lets the loop unwind; hooks run afterwards

pub mod console;
pub mod event_loop;

pub use event_loop::{EventLoop, ShellEvent, ShellProxy};

use crate::config::schema::DEFAULT_ROOT_URL;
use crate::error::SupervisorError;
use crate::lifecycle::{FirstRun, ShutdownHooks};
use crate::service::ServiceEvent;
use crate::tray::{action_from_command, MenuEntry, TrayController, TrayHost, MENU};

/// Persistent background indicator.
pub trait TrayIcon {
    fn show(&mut self, menu: &[MenuEntry]);

    /// User-visible message (errors, status).
    fn notify(&mut self, message: &str);
}

/// The setup surface. Showing it never blocks.
pub trait SetupSurface {
    fn show(&mut self);

    fn close(&mut self);

    fn is_visible(&self) -> bool;

    /// Feed a line of user input. Returns `Some(saved)` once the surface closes.
    fn handle_input(&mut self, line: &str) -> Option<bool>;
}

/// External viewer launch.
pub trait UrlOpener {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs in the user's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        webbrowser::open(url)
    }
}

/// Why the main loop returned.
#[derive(Debug)]
pub enum ShellOutcome {
    Quit,
    ServiceFailed(SupervisorError),
}

pub struct Shell<T, S, O> {
    events: EventLoop,
    tray: T,
    setup: S,
    opener: O,
    controller: TrayController,
    root_url: String,
    quit_requested: bool,
    setup_closed: bool,
    input_closed: bool,
    service_running: bool,
    failure: Option<SupervisorError>,
    hooks: ShutdownHooks,
}

impl<T: TrayIcon, S: SetupSurface, O: UrlOpener> Shell<T, S, O> {
    pub fn new(events: EventLoop, tray: T, setup: S, opener: O) -> Self {
        Self {
            events,
            tray,
            setup,
            opener,
            controller: TrayController::new(),
            root_url: DEFAULT_ROOT_URL.to_string(),
            quit_requested: false,
            setup_closed: false,
            input_closed: false,
            service_running: false,
            failure: None,
            hooks: ShutdownHooks::new(),
        }
    }

    pub fn proxy(&self) -> ShellProxy {
        self.events.proxy()
    }

    pub fn show_tray(&mut self) {
        self.tray.show(&MENU);
    }

    pub fn set_root_url(&mut self, url: impl Into<String>) {
        self.root_url = url.into();
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn notify(&mut self, message: &str) {
        self.tray.notify(message);
    }

    pub fn register_shutdown_hook<F>(&mut self, name: &'static str, hook: F)
    where
        F: FnOnce() -> Result<(), SupervisorError> + Send + 'static,
    {
        self.hooks.register(name, hook);
    }

    /// Run the main loop until Quit or a fatal service failure.
    pub fn run(&mut self) -> ShellOutcome {
        tracing::debug!("Shell main loop running");
        while !self.quit_requested && self.failure.is_none() {
            match self.events.next() {
                Some(event) => self.handle(event),
                None => break,
            }
        }

        match self.failure.take() {
            Some(e) => ShellOutcome::ServiceFailed(e),
            None => ShellOutcome::Quit,
        }
    }

    /// Run every registered shutdown hook, returning their errors.
    pub fn shutdown(&mut self) -> Vec<SupervisorError> {
        if self.setup.is_visible() {
            self.setup.close();
        }
        if self.hooks.is_empty() {
            tracing::debug!("No shutdown hooks registered");
        }
        self.hooks.run_all()
    }

    pub fn tray(&self) -> &T {
        &self.tray
    }

    pub fn setup(&self) -> &S {
        &self.setup
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    fn handle(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::Menu(action) => {
                let controller = self.controller;
                controller.dispatch(action, self);
            }
            ShellEvent::Input(line) => self.handle_input(&line),
            ShellEvent::SetupClosed { saved } => self.on_setup_closed(saved),
            ShellEvent::Service(event) => self.on_service_event(event),
            ShellEvent::Interrupt => self.request_quit(),
            ShellEvent::InputClosed => self.on_input_closed(),
        }
    }

    fn handle_input(&mut self, line: &str) {
        if self.setup.is_visible() {
            if let Some(saved) = self.setup.handle_input(line) {
                self.on_setup_closed(saved);
            }
            return;
        }

        match action_from_command(line) {
            Some(action) => {
                let controller = self.controller;
                controller.dispatch(action, self);
            }
            None if line.trim().is_empty() => {}
            None => self
                .tray
                .notify(&format!("Unknown command: {}", line.trim())),
        }
    }

    /// Without input the setup surface can never finish, so it counts as dismissed.
    fn on_input_closed(&mut self) {
        self.input_closed = true;
        if self.setup.is_visible() {
            tracing::warn!("Console input closed while setup was open, dismissing it");
            self.on_setup_closed(false);
        } else {
            tracing::debug!("Console input closed");
        }
    }

    fn on_setup_closed(&mut self, saved: bool) {
        if self.setup.is_visible() {
            self.setup.close();
        }
        self.setup_closed = true;
        tracing::info!(saved, "Setup surface closed");

        if saved && self.service_running {
            self.tray
                .notify("Configuration saved. Restart search-desk to apply it.");
        }
    }

    fn on_service_event(&mut self, event: ServiceEvent) {
        match event {
            ServiceEvent::Started { target, local_addr } => {
                tracing::info!(bind = %target, address = %local_addr, "Service running");
                self.service_running = true;
                self.tray.notify(&format!("Serving on {}", local_addr));
            }
            ServiceEvent::Failed(e) => {
                self.tray.notify(&format!("Service failed: {}", e));
                if self.failure.is_none() {
                    self.failure = Some(e);
                }
            }
            ServiceEvent::Exited => {
                tracing::debug!("Service thread exited");
                self.service_running = false;
            }
        }
    }
}

impl<T: TrayIcon, S: SetupSurface, O: UrlOpener> TrayHost for Shell<T, S, O> {
    fn root_url(&self) -> String {
        self.root_url.clone()
    }

    fn open_url(&mut self, url: &str) {
        if let Err(e) = self.opener.open(url) {
            tracing::debug!(url, error = %e, "Failed to open browser");
        }
    }

    fn show_setup(&mut self) {
        self.setup.show();
    }

    fn request_quit(&mut self) {
        tracing::info!("Quit requested");
        self.quit_requested = true;
        if self.setup.is_visible() {
            self.setup.close();
        }
    }
}

impl<T: TrayIcon, S: SetupSurface, O: UrlOpener> FirstRun for Shell<T, S, O> {
    /// Show the setup surface and pump the loop until it closes.
    ///
    /// A quit request also ends the wait; the surface is closed with it.
    fn run_first_run(&mut self) {
        self.setup_closed = false;
        self.setup.show();
        if self.input_closed {
            self.on_input_closed();
        }

        while !self.setup_closed && !self.quit_requested {
            match self.events.next() {
                Some(event) => self.handle(event),
                None => break,
            }
        }

        if self.setup.is_visible() {
            self.setup.close();
        }
    }
}
