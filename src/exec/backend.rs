// src/exec/backend.rs

//! Pluggable restart backend abstraction.
//!
//! The runtime talks to a `ProcessBackend` instead of the supervisor
//! directly. This makes it easy to swap in a fake backend in tests while
//! keeping the production implementation in [`supervisor`](super::supervisor).
//!
//! - `ProcessSupervisor` is the implementation used by `gorun`.
//! - Tests can provide their own `ProcessBackend` that, for example, only
//!   counts how many restarts were requested.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

use super::supervisor::ProcessSupervisor;

/// Trait abstracting how the supervised program is (re)started.
pub trait ProcessBackend: Send {
    /// Stop the current program instance (if any) and start a new one.
    fn restart_child(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

impl ProcessBackend for ProcessSupervisor {
    fn restart_child(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move { self.restart().await.map(|_| ()) })
    }
}
