// src/watch/poller.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::engine::coalescer::ChangeNotifier;
use crate::watch::baseline::Baseline;
use crate::watch::scanner::Scanner;

/// Spawn the polling loop.
///
/// Every `interval` the tree is walked once on the blocking pool. A hit
/// produces exactly one notification; the baseline is advanced by
/// [`Scanner::poll`] before the next cycle. The loop ends when the consumer
/// side of `notifier` has been dropped.
pub fn spawn_poller(
    scanner: Scanner,
    baseline: Arc<Baseline>,
    notifier: ChangeNotifier,
    interval: Duration,
) -> JoinHandle<()> {
    let scanner = Arc::new(scanner);

    tokio::spawn(async move {
        info!(root = %scanner.root().display(), ?interval, "polling for changes");

        loop {
            let cycle_scanner = Arc::clone(&scanner);
            let cycle_baseline = Arc::clone(&baseline);

            match tokio::task::spawn_blocking(move || cycle_scanner.poll(&cycle_baseline)).await {
                Ok(Some(change)) => {
                    debug!(path = %change.path.display(), "change detected");
                    if !notifier.notify() {
                        debug!("change consumer gone; poller exiting");
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => warn!(error = %err, "scan task failed; retrying next cycle"),
            }

            sleep(interval).await;
        }
    })
}
