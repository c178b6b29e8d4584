// src/engine/context.rs

use std::sync::Arc;

use crate::config::Settings;
use crate::exec::ProcessSupervisor;
use crate::watch::{Baseline, Scanner};

/// Long-lived state shared by the poller, the restart loop and the shutdown
/// coordinator.
///
/// Holds the validated settings, the change baseline and the process
/// supervisor. Cloning is cheap; every clone refers to the same baseline and
/// the same supervised child.
#[derive(Debug, Clone)]
pub struct SupervisorContext {
    settings: Arc<Settings>,
    baseline: Arc<Baseline>,
    supervisor: ProcessSupervisor,
}

impl SupervisorContext {
    /// Build the context; the child command line is the profile's fixed
    /// prefix followed by `passthrough`.
    pub fn new(settings: Settings, passthrough: &[String]) -> Self {
        let launch = settings.profile().command_line(passthrough);
        let supervisor = ProcessSupervisor::new(launch, settings.timing().settle_delay);

        Self {
            settings: Arc::new(settings),
            baseline: Arc::new(Baseline::starting_now()),
            supervisor,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn baseline(&self) -> Arc<Baseline> {
        Arc::clone(&self.baseline)
    }

    pub fn supervisor(&self) -> ProcessSupervisor {
        self.supervisor.clone()
    }

    pub fn scanner(&self) -> Scanner {
        Scanner::new(self.settings.watch())
    }
}
