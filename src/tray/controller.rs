//! Stateless routing of tray actions.

use crate::tray::actions::TrayAction;

/// What the tray controller may ask of the application shell.
pub trait TrayHost {
    /// The service's root URL as currently known.
    fn root_url(&self) -> String;

    /// Open `url` in the default browser. Fire-and-forget.
    fn open_url(&mut self, url: &str);

    /// Reveal the setup surface.
    fn show_setup(&mut self);

    /// Ask the shell to begin shutdown.
    fn request_quit(&mut self);
}

/// Routes menu actions to the shell. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrayController;

impl TrayController {
    pub fn new() -> Self {
        Self
    }

    pub fn dispatch<H: TrayHost + ?Sized>(&self, action: TrayAction, host: &mut H) {
        tracing::debug!(action = ?action, "Tray action");
        match action {
            TrayAction::Search => {
                let url = host.root_url();
                host.open_url(&url);
            }
            // Voluntary reconfiguration; the running service is left alone.
            TrayAction::Configure => host.show_setup(),
            TrayAction::Quit => host.request_quit(),
        }
    }
}
