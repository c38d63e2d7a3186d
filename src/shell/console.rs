//! Console renditions of the tray and setup surfaces.
//!
//! The tray menu is printed to the terminal and driven by typed commands.
//! The setup surface is a line-by-line wizard that writes the config file.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crate::config::{load_config, save_config, AppConfig, ContentSource};
use crate::shell::event_loop::{ShellEvent, ShellProxy};
use crate::shell::{SetupSurface, TrayIcon};
use crate::tray::MenuEntry;

/// Tray menu printed to a terminal.
pub struct ConsoleTray<W: Write> {
    out: W,
}

impl<W: Write> ConsoleTray<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> TrayIcon for ConsoleTray<W> {
    fn show(&mut self, menu: &[MenuEntry]) {
        let items = menu
            .iter()
            .map(|entry| format!("[{}] {}", entry.shortcut, entry.label))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(self.out, "search-desk is running in the background.");
        let _ = writeln!(self.out, "Menu: {}", items);
        let _ = writeln!(self.out, "Type a number or name and press Enter.");
        let _ = self.out.flush();
    }

    fn notify(&mut self, message: &str) {
        let _ = writeln!(self.out, "» {}", message);
        let _ = self.out.flush();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Host,
    Port,
    Socket,
    Content(usize),
    Confirm,
}

/// Content sections offered by the wizard, in prompt order.
const CONTENT_KINDS: [&str; 4] = ["Org-mode", "Markdown", "Beancount", "Image"];

fn content_ref(config: &AppConfig, index: usize) -> Option<&ContentSource> {
    match index {
        0 => config.content.org.as_ref(),
        1 => config.content.markdown.as_ref(),
        2 => config.content.ledger.as_ref(),
        _ => config.content.image.as_ref(),
    }
}

fn content_slot(config: &mut AppConfig, index: usize) -> &mut Option<ContentSource> {
    match index {
        0 => &mut config.content.org,
        1 => &mut config.content.markdown,
        2 => &mut config.content.ledger,
        _ => &mut config.content.image,
    }
}

struct Wizard {
    step: Step,
    draft: AppConfig,
}

/// Interactive setup wizard. Writes the config file on confirmation.
pub struct ConsoleSetup<W: Write> {
    path: PathBuf,
    out: W,
    wizard: Option<Wizard>,
}

impl<W: Write> ConsoleSetup<W> {
    pub fn new(path: impl Into<PathBuf>, out: W) -> Self {
        Self {
            path: path.into(),
            out,
            wizard: None,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn prompt(&mut self) {
        let Some(wizard) = &self.wizard else { return };
        let draft = &wizard.draft;
        let text = match wizard.step {
            Step::Host => format!("Host [{}]", draft.server.host),
            Step::Port => format!("Port [{}]", draft.server.port),
            Step::Socket => match &draft.server.socket {
                Some(path) => format!("Local socket path, '-' for TCP [{}]", path.display()),
                None => "Local socket path (blank for TCP)".to_string(),
            },
            Step::Content(index) => {
                let current = match content_ref(draft, index) {
                    Some(source) => source
                        .directories
                        .iter()
                        .map(|d| d.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                    None => "disabled".to_string(),
                };
                format!(
                    "{} directories, comma separated, '-' to disable [{}]",
                    CONTENT_KINDS[index], current
                )
            }
            Step::Confirm => format!("Save to {}? [y/N]", self.path.display()),
        };
        let _ = write!(self.out, "{}: ", text);
        let _ = self.out.flush();
    }

    fn dismiss(&mut self, message: &str) -> Option<bool> {
        self.wizard = None;
        let _ = writeln!(self.out, "{}", message);
        Some(false)
    }

    fn finish(&mut self, draft: AppConfig) -> Option<bool> {
        self.wizard = None;
        match save_config(&self.path, &draft) {
            Ok(()) => {
                let _ = writeln!(self.out, "Saved configuration to {}", self.path.display());
                Some(true)
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Setup could not save configuration");
                let _ = writeln!(self.out, "Could not save configuration: {}", e);
                Some(false)
            }
        }
    }
}

fn parse_directories(input: &str) -> Vec<PathBuf> {
    input
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .collect()
}

impl<W: Write> SetupSurface for ConsoleSetup<W> {
    fn show(&mut self) {
        if self.wizard.is_none() {
            // Start from the saved file when there is one, valid or not.
            let draft = load_config(&self.path)
                .ok()
                .or_else(|| {
                    std::fs::read_to_string(&self.path)
                        .ok()
                        .and_then(|raw| toml::from_str(&raw).ok())
                })
                .unwrap_or_default();
            self.wizard = Some(Wizard {
                step: Step::Host,
                draft,
            });
            let _ = writeln!(
                self.out,
                "search-desk setup. Press Enter to keep a value, 'cancel' to dismiss."
            );
        }
        self.prompt();
    }

    fn close(&mut self) {
        if self.wizard.take().is_some() {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
        }
    }

    fn is_visible(&self) -> bool {
        self.wizard.is_some()
    }

    fn handle_input(&mut self, line: &str) -> Option<bool> {
        let input = line.trim();
        if self.wizard.is_some() && input.eq_ignore_ascii_case("cancel") {
            return self.dismiss("Setup dismissed.");
        }

        let wizard = self.wizard.as_mut()?;
        match wizard.step {
            Step::Host => {
                if !input.is_empty() {
                    wizard.draft.server.host = input.to_string();
                    wizard.draft.server.socket = None;
                }
                wizard.step = Step::Port;
            }
            Step::Port => {
                if !input.is_empty() {
                    match input.parse::<u16>() {
                        Ok(port) if port > 0 => {
                            wizard.draft.server.port = port;
                            wizard.draft.server.socket = None;
                        }
                        _ => {
                            let _ = writeln!(self.out, "Not a port number: {}", input);
                            self.prompt();
                            return None;
                        }
                    }
                }
                wizard.step = Step::Socket;
            }
            Step::Socket => {
                match input {
                    "" => {}
                    "-" => wizard.draft.server.socket = None,
                    path => wizard.draft.server.socket = Some(PathBuf::from(path)),
                }
                wizard.step = Step::Content(0);
            }
            Step::Content(index) => {
                match input {
                    "" => {}
                    "-" => *content_slot(&mut wizard.draft, index) = None,
                    dirs => {
                        *content_slot(&mut wizard.draft, index) = Some(ContentSource {
                            directories: parse_directories(dirs),
                        })
                    }
                }
                wizard.step = if index + 1 < CONTENT_KINDS.len() {
                    Step::Content(index + 1)
                } else {
                    Step::Confirm
                };
            }
            Step::Confirm => {
                return if matches!(input.to_ascii_lowercase().as_str(), "y" | "yes") {
                    let draft = wizard.draft.clone();
                    self.finish(draft)
                } else {
                    self.dismiss("Setup dismissed.")
                };
            }
        }

        self.prompt();
        None
    }
}

/// Forward stdin lines into the event loop from a dedicated thread.
///
/// Sends [`ShellEvent::InputClosed`] at end of input.
pub fn spawn_stdin_reader(proxy: ShellProxy) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if !proxy.send(ShellEvent::Input(line)) {
                    return;
                }
            }
            proxy.send(ShellEvent::InputClosed);
        })
}
