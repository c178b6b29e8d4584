// src/exec/signal.rs

//! Process-group signalling.

use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;

use crate::errors::Result;

/// Send `signal` to every process in group `pgid`.
///
/// Returns `Ok(false)` if the group no longer exists.
pub fn signal_group(pgid: u32, signal: Signal) -> Result<bool> {
    match killpg(Pid::from_raw(pgid as i32), signal) {
        Ok(()) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Whether a child's exit is the expected result of a kill we issued.
///
/// Death by SIGKILL is always treated as ours; any other signal death only
/// when the supervisor had already asked that child to stop.
pub fn is_intentional_kill(status: &ExitStatus, requested_by_us: bool) -> bool {
    match status.signal() {
        Some(sig) if sig == Signal::SIGKILL as i32 => true,
        Some(_) => requested_by_us,
        None => false,
    }
}
