// src/exec/supervisor.rs

//! Lifecycle of the single supervised child process.
//!
//! Every child is started as the leader of its own process group, with the
//! supervisor's stdio and environment. Before a new child starts, the whole
//! group of the previous one is SIGKILLed and the supervisor pauses for a
//! short settle delay so ports and file descriptors can be released.
//!
//! All state lives behind one async mutex that `restart` holds for the whole
//! kill-then-spawn sequence, so restarts are strictly sequential and there is
//! never more than one tracked child.

use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, anyhow};
use nix::sys::signal::Signal;
use tokio::process::Command;
use tokio::sync::{Mutex, watch};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::LaunchSpec;
use crate::errors::{GorunError, Result};
use crate::exec::signal::{is_intentional_kill, signal_group};

/// How a child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildExit {
    pub status: ExitStatus,
    /// The exit was caused by a kill the supervisor issued, so it was not
    /// reported as a failure.
    pub stopped_by_supervisor: bool,
}

/// Observer for one child's exit. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ChildHandle {
    pub pid: u32,
    pub generation: u64,
    exit: watch::Receiver<Option<ChildExit>>,
}

impl ChildHandle {
    pub fn has_exited(&self) -> bool {
        self.exit.borrow().is_some()
    }

    pub fn exit(&self) -> Option<ChildExit> {
        *self.exit.borrow()
    }

    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit().map(|exit| exit.status)
    }

    /// Wait until the child has been reaped.
    ///
    /// Returns `None` if the wait itself failed and no status is available.
    pub async fn wait(&mut self) -> Option<ExitStatus> {
        match self.exit.wait_for(|exit| exit.is_some()).await {
            Ok(exit) => exit.map(|exit| exit.status),
            Err(_) => None,
        }
    }
}

/// The tracked child: its process group plus an exit observer.
#[derive(Debug)]
pub struct SupervisedProcess {
    pgid: u32,
    generation: u64,
    stop_requested: Arc<AtomicBool>,
    handle: ChildHandle,
}

impl SupervisedProcess {
    pub fn pgid(&self) -> u32 {
        self.pgid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn handle(&self) -> ChildHandle {
        self.handle.clone()
    }

    /// Send `signal` to the child's process group, recording that the
    /// resulting exit was requested by the supervisor.
    ///
    /// Returns `Ok(false)` if the group is already gone.
    pub fn signal(&self, signal: Signal) -> Result<bool> {
        self.stop_requested.store(true, Ordering::SeqCst);
        signal_group(self.pgid, signal)
    }

    pub async fn wait(&mut self) -> Option<ExitStatus> {
        self.handle.wait().await
    }

    /// A tracked group whose exit status will never be observed.
    #[cfg(test)]
    pub(crate) fn unobserved(pgid: u32, generation: u64) -> Self {
        let (_, exit) = watch::channel(None);
        Self {
            pgid,
            generation,
            stop_requested: Arc::new(AtomicBool::new(false)),
            handle: ChildHandle {
                pid: pgid,
                generation,
                exit,
            },
        }
    }
}

#[derive(Debug, Default)]
struct SupervisorState {
    current: Option<SupervisedProcess>,
    generation: u64,
    stopping: bool,
}

/// Owner of the supervised child. Clones share the same state.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    launch: Arc<LaunchSpec>,
    settle_delay: Duration,
    state: Arc<Mutex<SupervisorState>>,
}

impl ProcessSupervisor {
    pub fn new(launch: LaunchSpec, settle_delay: Duration) -> Self {
        Self {
            launch: Arc::new(launch),
            settle_delay,
            state: Arc::new(Mutex::new(SupervisorState::default())),
        }
    }

    pub fn launch_spec(&self) -> &LaunchSpec {
        &self.launch
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Kill whatever is currently tracked, then start a fresh child.
    ///
    /// The last call wins: concurrent callers are serialised, and each one
    /// kills its predecessor's whole process group before spawning.
    pub async fn restart(&self) -> Result<ChildHandle> {
        let mut state = self.state.lock().await;
        if state.stopping {
            return Err(GorunError::ShuttingDown);
        }

        if let Some(previous) = state.current.take() {
            self.kill_previous(previous).await;
        }

        state.generation += 1;
        let generation = state.generation;

        let process = self.spawn(generation)?;
        let handle = process.handle();
        state.current = Some(process);

        Ok(handle)
    }

    /// Handle of the currently tracked child, if any.
    pub async fn current(&self) -> Option<ChildHandle> {
        self.state.lock().await.current.as_ref().map(|p| p.handle())
    }

    /// Stop accepting restarts and hand over the current child, if any.
    ///
    /// After this call `restart` fails with [`GorunError::ShuttingDown`].
    pub async fn take_for_shutdown(&self) -> Option<SupervisedProcess> {
        let mut state = self.state.lock().await;
        state.stopping = true;
        state.current.take()
    }

    async fn kill_previous(&self, previous: SupervisedProcess) {
        debug!(
            pgid = previous.pgid(),
            generation = previous.generation(),
            "killing previous process group"
        );
        match previous.signal(Signal::SIGKILL) {
            Ok(true) => {}
            Ok(false) => debug!(pgid = previous.pgid(), "previous process group already gone"),
            Err(err) => warn!(
                pgid = previous.pgid(),
                error = %err,
                "failed to kill previous process group"
            ),
        }
        sleep(self.settle_delay).await;
    }

    fn spawn(&self, generation: u64) -> Result<SupervisedProcess> {
        let mut cmd = Command::new(&self.launch.program);
        cmd.args(&self.launch.args)
            .process_group(0)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning `{}`", self.launch))?;
        let pid = child
            .id()
            .ok_or_else(|| anyhow!("spawned process for `{}` has no pid", self.launch))?;

        info!(pid, generation, cmd = %self.launch, "process started");

        let (exit_tx, exit_rx) = watch::channel(None);
        let stop_requested = Arc::new(AtomicBool::new(false));

        let requested = Arc::clone(&stop_requested);
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => {
                    let stopped_by_supervisor =
                        is_intentional_kill(&status, requested.load(Ordering::SeqCst));
                    if status.success() {
                        info!(pid, generation, "process exited");
                    } else if stopped_by_supervisor {
                        debug!(pid, generation, %status, "process stopped by supervisor");
                    } else {
                        error!(pid, generation, %status, "Run process failed");
                    }
                    exit_tx.send_replace(Some(ChildExit {
                        status,
                        stopped_by_supervisor,
                    }));
                }
                Err(err) => {
                    error!(pid, generation, error = %err, "Run process failed");
                }
            }
        });

        Ok(SupervisedProcess {
            pgid: pid,
            generation,
            stop_requested,
            handle: ChildHandle {
                pid,
                generation,
                exit: exit_rx,
            },
        })
    }
}
