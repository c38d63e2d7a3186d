//! Shutdown coordination.
//!
//! Two pieces: a broadcast [`Shutdown`] signal that the service thread
//! observes to stop serving, and [`ShutdownHooks`], the work the shell runs
//! on Quit before the process is allowed to exit.

use tokio::sync::broadcast;

use crate::error::SupervisorError;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that long-running tasks can subscribe to.
#[derive(Debug, Clone)]
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

type HookFn = Box<dyn FnOnce() -> Result<(), SupervisorError> + Send>;

/// Work registered against the application's quit signal.
///
/// Hooks run once, last registered first. A failing hook is reported and the
/// remaining hooks still run.
#[derive(Default)]
pub struct ShutdownHooks {
    hooks: Vec<(&'static str, HookFn)>,
}

impl ShutdownHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &'static str, hook: F)
    where
        F: FnOnce() -> Result<(), SupervisorError> + Send + 'static,
    {
        tracing::debug!(hook = name, "Shutdown hook registered");
        self.hooks.push((name, Box::new(hook)));
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run and drain every hook, returning the errors they produced.
    pub fn run_all(&mut self) -> Vec<SupervisorError> {
        let mut errors = Vec::new();
        while let Some((name, hook)) = self.hooks.pop() {
            tracing::info!(hook = name, "Running shutdown hook");
            if let Err(e) = hook() {
                tracing::error!(hook = name, error = %e, "Shutdown hook failed");
                errors.push(e);
            }
        }
        errors
    }
}

impl std::fmt::Debug for ShutdownHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|(name, _)| name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn hooks_run_once_in_reverse_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = ShutdownHooks::new();
        for name in ["first", "second"] {
            let order = order.clone();
            hooks.register(name, move || {
                order.lock().unwrap().push(name);
                Ok(())
            });
        }

        assert!(hooks.run_all().is_empty());
        assert!(hooks.run_all().is_empty());
        assert_eq!(*order.lock().unwrap(), vec!["second", "first"]);
    }

    #[test]
    fn failing_hook_does_not_stop_others() {
        let ran = Arc::new(Mutex::new(false));
        let mut hooks = ShutdownHooks::new();
        let flag = ran.clone();
        hooks.register("after", move || {
            *flag.lock().unwrap() = true;
            Ok(())
        });
        hooks.register("slow", || Err(SupervisorError::ShutdownTimeout(Duration::from_secs(1))));

        let errors = hooks.run_all();
        assert_eq!(errors.len(), 1);
        assert!(*ran.lock().unwrap());
        assert!(hooks.is_empty());
    }

    #[tokio::test]
    async fn trigger_reaches_subscribers() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        shutdown.trigger();
        assert!(rx.recv().await.is_ok());
    }
}
