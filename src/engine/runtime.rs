// src/engine/runtime.rs

use std::fmt;

use tracing::{debug, error, info};

use crate::engine::RuntimeOptions;
use crate::engine::coalescer::Coalescer;
use crate::errors::GorunError;
use crate::exec::ProcessBackend;

/// The restart-consumer loop.
///
/// Waits for coalesced change batches and turns each batch into exactly one
/// restart on the `ProcessBackend`. Restart failures are logged and the loop
/// keeps going; it only ends when the change channel closes or the backend
/// reports that shutdown has begun.
pub struct Runtime<B: ProcessBackend> {
    coalescer: Coalescer,
    backend: B,
    options: RuntimeOptions,
    restarts: u64,
}

impl<B: ProcessBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("options", &self.options)
            .field("restarts", &self.restarts)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend> Runtime<B> {
    pub fn new(coalescer: Coalescer, backend: B, options: RuntimeOptions) -> Self {
        Self {
            coalescer,
            backend,
            options,
            restarts: 0,
        }
    }

    /// Main loop. Returns the number of successful restarts.
    pub async fn run(mut self) -> u64 {
        info!("gorun runtime started");

        if self.options.restart_on_start && !self.restart().await {
            return self.restarts;
        }

        while let Some(collapsed) = self.coalescer.next_batch().await {
            debug!(collapsed, "change batch received");
            info!("rebuilding...");

            if !self.restart().await {
                break;
            }
        }

        info!(restarts = self.restarts, "runtime exiting");
        self.restarts
    }

    /// Returns `false` when the loop should stop.
    async fn restart(&mut self) -> bool {
        match self.backend.restart_child().await {
            Ok(()) => {
                self.restarts += 1;
                true
            }
            Err(GorunError::ShuttingDown) => {
                debug!("shutdown in progress; restart skipped");
                false
            }
            Err(err) => {
                error!(error = %err, "Run process failed");
                true
            }
        }
    }
}
