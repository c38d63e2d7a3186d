//! Foreground event loop plumbing.
//!
//! Every context other than the foreground thread (stdin reader, signal
//! thread, service thread) talks to the shell only by posting a
//! [`ShellEvent`] through a [`ShellProxy`].

use tokio::sync::mpsc;

use crate::service::ServiceEvent;
use crate::tray::TrayAction;

#[derive(Debug)]
pub enum ShellEvent {
    /// A tray menu item was activated.
    Menu(TrayAction),
    /// One line of console input.
    Input(String),
    /// The setup surface closed.
    SetupClosed { saved: bool },
    /// News from the service thread.
    Service(ServiceEvent),
    /// SIGINT/SIGTERM; treated like Quit.
    Interrupt,
    /// Console input reached end of file.
    InputClosed,
}

/// Cloneable handle for posting events into the foreground loop.
#[derive(Debug, Clone)]
pub struct ShellProxy {
    tx: mpsc::UnboundedSender<ShellEvent>,
}

impl ShellProxy {
    /// Post an event. Returns false once the loop is gone.
    pub fn send(&self, event: ShellEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// The single foreground event queue.
#[derive(Debug)]
pub struct EventLoop {
    rx: mpsc::UnboundedReceiver<ShellEvent>,
    proxy: ShellProxy,
}

impl EventLoop {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            rx,
            proxy: ShellProxy { tx },
        }
    }

    pub fn proxy(&self) -> ShellProxy {
        self.proxy.clone()
    }

    /// Block the foreground thread until the next event.
    ///
    /// Must not be called from inside an async runtime.
    pub fn next(&mut self) -> Option<ShellEvent> {
        self.rx.blocking_recv()
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_order_from_any_thread() {
        let mut events = EventLoop::new();
        let proxy = events.proxy();
        std::thread::spawn(move || {
            proxy.send(ShellEvent::Menu(TrayAction::Search));
            proxy.send(ShellEvent::Interrupt);
        })
        .join()
        .unwrap();

        assert!(matches!(events.next(), Some(ShellEvent::Menu(TrayAction::Search))));
        assert!(matches!(events.next(), Some(ShellEvent::Interrupt)));
    }
}
