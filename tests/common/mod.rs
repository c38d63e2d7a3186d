//! Shared fakes for supervisor tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use search_desk::config::{AppConfig, ConfigProvider, ContentSource};
use search_desk::service::{BindTarget, ServiceControl, ServiceStop};
use search_desk::shell::{EventLoop, SetupSurface, Shell, TrayIcon, UrlOpener};
use search_desk::tray::MenuEntry;
use search_desk::SupervisorError;

/// A configuration that passes validation.
pub fn searchable_config(port: u16) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = port;
    config.content.markdown = Some(ContentSource {
        directories: vec![PathBuf::from("/home/me/notes")],
    });
    config
}

/// Answers queries from a script, then keeps answering `None`.
pub struct ScriptedProvider {
    answers: RefCell<VecDeque<Option<AppConfig>>>,
    pub queries: Cell<usize>,
}

impl ScriptedProvider {
    pub fn new(answers: Vec<Option<AppConfig>>) -> Self {
        Self {
            answers: RefCell::new(answers.into()),
            queries: Cell::new(0),
        }
    }
}

impl ConfigProvider for ScriptedProvider {
    fn configuration(&self) -> Option<AppConfig> {
        self.queries.set(self.queries.get() + 1);
        self.answers.borrow_mut().pop_front().flatten()
    }
}

#[derive(Default)]
pub struct RecordingTray {
    pub shown: usize,
    pub messages: Vec<String>,
}

impl TrayIcon for RecordingTray {
    fn show(&mut self, _menu: &[MenuEntry]) {
        self.shown += 1;
    }

    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Setup surface closed only by `SetupClosed` events or quit.
#[derive(Default)]
pub struct RecordingSetup {
    pub visible: bool,
    pub shown: usize,
}

impl SetupSurface for RecordingSetup {
    fn show(&mut self) {
        self.visible = true;
        self.shown += 1;
    }

    fn close(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn handle_input(&mut self, _line: &str) -> Option<bool> {
        None
    }
}

#[derive(Default)]
pub struct RecordingOpener {
    pub opened: RefCell<Vec<String>>,
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &str) -> std::io::Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

pub type TestShell = Shell<RecordingTray, RecordingSetup, RecordingOpener>;

pub fn test_shell() -> TestShell {
    Shell::new(
        EventLoop::new(),
        RecordingTray::default(),
        RecordingSetup::default(),
        RecordingOpener::default(),
    )
}

/// Records start calls; handles count their effective stops.
#[derive(Default)]
pub struct FakeControl {
    pub starts: Vec<BindTarget>,
    pub stops: Arc<AtomicUsize>,
    pub start_error: Option<SupervisorError>,
    pub stop_times_out: bool,
}

impl FakeControl {
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

pub struct FakeHandle {
    stops: Arc<AtomicUsize>,
    running: bool,
    times_out: bool,
}

impl ServiceControl for FakeControl {
    type Handle = FakeHandle;

    fn start(
        &mut self,
        target: BindTarget,
        _config: &AppConfig,
    ) -> Result<FakeHandle, SupervisorError> {
        self.starts.push(target);
        if let Some(e) = self.start_error.take() {
            return Err(e);
        }
        Ok(FakeHandle {
            stops: self.stops.clone(),
            running: true,
            times_out: self.stop_times_out,
        })
    }
}

impl ServiceStop for FakeHandle {
    fn stop(&mut self) -> Result<(), SupervisorError> {
        if !self.running {
            return Ok(());
        }
        self.running = false;
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.times_out {
            Err(SupervisorError::ShutdownTimeout(Duration::from_millis(10)))
        } else {
            Ok(())
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
