// src/engine/shutdown.rs

//! Graceful-then-forced teardown on SIGHUP / SIGINT / SIGTERM / SIGQUIT.
//!
//! `Running -> Stopping` is a one-way transition. On entering `Stopping` the
//! coordinator takes the child away from the supervisor (so no restart can
//! replace it), sends SIGTERM to its process group and races the child's exit
//! against the grace period. If the grace period wins, the group gets SIGKILL
//! followed by a short settle pause.

use std::future::pending;
use std::time::Duration;

use nix::sys::signal::Signal as UnixSignal;
use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::{ProcessSupervisor, SupervisedProcess};

/// Listeners for the termination signals the supervisor reacts to:
/// SIGHUP, SIGINT, SIGTERM and SIGQUIT.
///
/// Install these before the first child starts so no signal slips through
/// to the default handler.
#[derive(Debug)]
pub struct TerminationSignals {
    hangup: Signal,
    interrupt: Signal,
    terminate: Signal,
    quit: Signal,
}

impl TerminationSignals {
    pub fn install() -> Result<Self> {
        Ok(Self {
            hangup: signal(SignalKind::hangup())?,
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    /// Wait for the first termination signal and return its name.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.hangup.recv() => "SIGHUP",
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.quit.recv() => "SIGQUIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    Stopping,
}

/// How teardown of the child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// There was no child to stop (or shutdown had already run).
    NoChild,
    /// The child exited within the grace period.
    Graceful,
    /// The grace period elapsed and the group was SIGKILLed.
    Forced,
}

#[derive(Debug)]
pub struct ShutdownCoordinator {
    supervisor: ProcessSupervisor,
    grace_period: Duration,
    settle_delay: Duration,
    state: ShutdownState,
}

impl ShutdownCoordinator {
    pub fn new(supervisor: ProcessSupervisor, grace_period: Duration) -> Self {
        let settle_delay = supervisor.settle_delay();
        Self {
            supervisor,
            grace_period,
            settle_delay,
            state: ShutdownState::Running,
        }
    }

    pub fn state(&self) -> ShutdownState {
        self.state
    }

    /// Stop the current child. Always completes; errors are logged.
    pub async fn shutdown(&mut self) -> ShutdownOutcome {
        if self.state == ShutdownState::Stopping {
            debug!("shutdown already handled");
            return ShutdownOutcome::NoChild;
        }
        self.state = ShutdownState::Stopping;

        let Some(mut process) = self.supervisor.take_for_shutdown().await else {
            debug!("no running process to stop");
            return ShutdownOutcome::NoChild;
        };

        stop_process(&mut process, self.grace_period, self.settle_delay).await
    }
}

/// SIGTERM the group, then race its exit against `grace_period`.
///
/// A child whose exit status cannot be observed is treated as still running,
/// so it only ends through the SIGKILL path.
async fn stop_process(
    process: &mut SupervisedProcess,
    grace_period: Duration,
    settle_delay: Duration,
) -> ShutdownOutcome {
    info!(pgid = process.pgid(), "start gracefully stop");
    match process.signal(UnixSignal::SIGTERM) {
        Ok(true) => {}
        Ok(false) => {
            info!("gracefully stop successfully");
            return ShutdownOutcome::Graceful;
        }
        Err(err) => warn!(error = %err, "failed to send SIGTERM to process group"),
    }

    let exited = async {
        if process.wait().await.is_none() {
            debug!("exit status unavailable; waiting for grace period");
            pending::<()>().await;
        }
    };

    tokio::select! {
        _ = exited => {
            info!("gracefully stop successfully");
            ShutdownOutcome::Graceful
        }
        _ = sleep(grace_period) => {
            warn!(?grace_period, "gracefully stop failed, force exit");
            if let Err(err) = process.signal(UnixSignal::SIGKILL) {
                warn!(error = %err, "failed to send SIGKILL to process group");
            }
            sleep(settle_delay).await;
            ShutdownOutcome::Forced
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LaunchSpec;
    use crate::errors::GorunError;
    use std::os::unix::process::{CommandExt, ExitStatusExt};

    #[tokio::test]
    async fn no_child_goes_straight_to_exit() {
        let supervisor =
            ProcessSupervisor::new(LaunchSpec::new("true", Vec::<String>::new()), Duration::ZERO);
        let mut coordinator = ShutdownCoordinator::new(supervisor.clone(), Duration::from_secs(1));

        assert_eq!(coordinator.shutdown().await, ShutdownOutcome::NoChild);
        assert_eq!(coordinator.state(), ShutdownState::Stopping);
        assert!(matches!(
            supervisor.restart().await,
            Err(GorunError::ShuttingDown)
        ));
    }

    #[tokio::test]
    async fn unobserved_exit_still_ends_in_sigkill() {
        let mut child = std::process::Command::new("sh")
            .args(["-c", "trap '' TERM; sleep 30"])
            .process_group(0)
            .spawn()
            .unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;

        let mut process = SupervisedProcess::unobserved(child.id(), 1);
        let outcome =
            stop_process(&mut process, Duration::from_millis(200), Duration::from_millis(10)).await;
        assert_eq!(outcome, ShutdownOutcome::Forced);

        let status = child.wait().unwrap();
        assert_eq!(status.signal(), Some(UnixSignal::SIGKILL as i32));
    }

    #[tokio::test]
    async fn second_shutdown_is_a_no_op() {
        let supervisor = ProcessSupervisor::new(
            LaunchSpec::new("sh", ["-c", "sleep 30"]),
            Duration::from_millis(10),
        );
        supervisor.restart().await.unwrap();

        let mut coordinator = ShutdownCoordinator::new(supervisor, Duration::from_secs(5));
        assert_eq!(coordinator.shutdown().await, ShutdownOutcome::Graceful);
        assert_eq!(coordinator.shutdown().await, ShutdownOutcome::NoChild);
    }
}
