// src/engine/mod.rs

//! Orchestration engine for gorun.
//!
//! This module ties together:
//! - the change coalescer (bursts of notifications become one restart)
//! - the restart-consumer loop that drives the process backend
//! - the shutdown coordinator that reacts to termination signals
//! - the shared context handed to each of those concurrency units

pub mod coalescer;
pub mod context;
pub mod runtime;
pub mod shutdown;

/// Options for the restart loop.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Start the program once before waiting for any change.
    pub restart_on_start: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            restart_on_start: true,
        }
    }
}

pub use coalescer::{ChangeNotifier, Coalescer};
pub use context::SupervisorContext;
pub use runtime::Runtime;
pub use shutdown::{ShutdownCoordinator, ShutdownOutcome, ShutdownState, TerminationSignals};
