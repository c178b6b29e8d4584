// src/engine/coalescer.rs

//! Change notification channel with burst coalescing.
//!
//! The producer side ([`ChangeNotifier`]) never blocks: notifications go into
//! a small bounded buffer and are dropped when it is full. Dropping is safe
//! because a notification already sitting in the buffer guarantees a restart.
//!
//! The consumer side ([`Coalescer`]) waits for one notification and then
//! drains everything else already queued, so a burst of k >= 1 notifications
//! becomes a single restart.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::trace;

/// Capacity of the notification buffer.
pub const CHANNEL_CAPACITY: usize = 10;

/// Create a connected notifier/coalescer pair.
pub fn channel() -> (ChangeNotifier, Coalescer) {
    channel_with_capacity(CHANNEL_CAPACITY)
}

pub fn channel_with_capacity(capacity: usize) -> (ChangeNotifier, Coalescer) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChangeNotifier { tx }, Coalescer { rx })
}

/// Producer handle; cheap to clone.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: mpsc::Sender<()>,
}

impl ChangeNotifier {
    /// Signal that something changed.
    ///
    /// Returns `false` only if the consumer is gone.
    pub fn notify(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => {
                trace!("change buffer full; dropping notification");
                true
            }
            Err(TrySendError::Closed(())) => false,
        }
    }
}

/// Consumer handle.
#[derive(Debug)]
pub struct Coalescer {
    rx: mpsc::Receiver<()>,
}

impl Coalescer {
    /// Wait for at least one notification, then drain whatever else is
    /// queued without blocking.
    ///
    /// Returns the number of notifications collapsed into this batch, or
    /// `None` once every notifier has been dropped and the buffer is empty.
    pub async fn next_batch(&mut self) -> Option<usize> {
        self.rx.recv().await?;

        let mut collapsed = 1;
        while self.rx.try_recv().is_ok() {
            collapsed += 1;
        }

        trace!(collapsed, "coalesced change notifications");
        Some(collapsed)
    }
}
