//! Startup gate: no service starts without a validated configuration.
//!
//! # Responsibilities
//! - Query the configuration provider
//! - Run the first-run setup surface once when unconfigured
//! - Re-query exactly once, then give up
//!
//! # Design Decisions
//! - Fail fast: a second miss is fatal, there is no retry loop
//! - The first-run wait pumps the foreground loop rather than blocking a thread
//! - A dismissed surface still re-queries; the file may have been edited elsewhere

use crate::config::{AppConfig, ConfigProvider};
use crate::error::SupervisorError;
use crate::lifecycle::state::{Lifecycle, LifecycleState};
use crate::service::BindTarget;

/// Runs the first-run experience to completion.
///
/// Implementations show the setup surface and drive the foreground event
/// loop until that surface reports closed.
pub trait FirstRun {
    fn run_first_run(&mut self);
}

/// A configuration the service may start with.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub config: AppConfig,
    pub target: BindTarget,
}

impl Resolution {
    fn from_config(config: AppConfig) -> Self {
        let target = config.bind_target();
        Self { config, target }
    }
}

pub struct LifecycleGate<'a, P: ConfigProvider + ?Sized> {
    provider: &'a P,
    lifecycle: Lifecycle,
}

impl<'a, P: ConfigProvider + ?Sized> LifecycleGate<'a, P> {
    pub fn new(provider: &'a P, lifecycle: Lifecycle) -> Self {
        Self {
            provider,
            lifecycle,
        }
    }

    /// Resolve the bind target, prompting at most once.
    pub fn resolve<F: FirstRun + ?Sized>(
        &self,
        first_run: &mut F,
    ) -> Result<Resolution, SupervisorError> {
        if let Some(config) = self.provider.configuration() {
            self.advance(LifecycleState::Configured);
            let resolution = Resolution::from_config(config);
            tracing::info!(bind = %resolution.target, "Configuration found");
            return Ok(resolution);
        }

        tracing::info!("No configuration, starting first-run setup");
        self.advance(LifecycleState::AwaitingFirstRun);
        first_run.run_first_run();

        match self.provider.configuration() {
            Some(config) => {
                self.advance(LifecycleState::Configured);
                let resolution = Resolution::from_config(config);
                tracing::info!(bind = %resolution.target, "Configured by first-run setup");
                Ok(resolution)
            }
            None => {
                self.advance(LifecycleState::Terminated);
                tracing::error!("Still unconfigured after first-run setup");
                Err(SupervisorError::ConfigurationMissing)
            }
        }
    }

    fn advance(&self, next: LifecycleState) {
        if let Err(e) = self.lifecycle.transition(next) {
            tracing::warn!(error = %e, "Gate transition rejected");
        }
    }
}
