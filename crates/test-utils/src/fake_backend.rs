use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use gorun::errors::{GorunError, Result};
use gorun::exec::ProcessBackend;

/// A fake backend that:
/// - counts how many restarts were requested
/// - can be told to fail or to report shutdown after a number of calls.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    restarts: Arc<AtomicU64>,
    fail_first: Arc<AtomicUsize>,
    shutting_down_after: Option<u64>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the first `n` restart calls fail with an IO error.
    pub fn failing_first(self, n: usize) -> Self {
        self.fail_first.store(n, Ordering::SeqCst);
        self
    }

    /// Report `ShuttingDown` once `n` restarts have succeeded.
    pub fn shutting_down_after(mut self, n: u64) -> Self {
        self.shutting_down_after = Some(n);
        self
    }

    /// Shared counter of successful restarts.
    pub fn restarts(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.restarts)
    }
}

impl ProcessBackend for FakeBackend {
    fn restart_child(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if let Some(limit) = self.shutting_down_after {
                if self.restarts.load(Ordering::SeqCst) >= limit {
                    return Err(GorunError::ShuttingDown);
                }
            }

            let remaining_failures = self.fail_first.load(Ordering::SeqCst);
            if remaining_failures > 0 {
                self.fail_first.store(remaining_failures - 1, Ordering::SeqCst);
                return Err(GorunError::IoError(std::io::Error::other(
                    "fake launch failure",
                )));
            }

            self.restarts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}
