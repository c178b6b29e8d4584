// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod watch;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::CliArgs;
use crate::config::load_settings;
use crate::engine::{
    Runtime, RuntimeOptions, ShutdownCoordinator, SupervisorContext, TerminationSignals,
    coalescer,
};
use crate::watch::spawn_poller;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings resolution (profile, watch root, timings)
/// - the mtime poller feeding the change coalescer
/// - the restart loop driving the process supervisor
/// - termination-signal handling and graceful shutdown
///
/// Returns once shutdown has completed; the caller is expected to exit the
/// process immediately afterwards.
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings().context("resolving gorun settings")?;
    let timing = settings.timing();

    // Listen before the first child exists so no signal hits the default handler.
    let mut signals = TerminationSignals::install().context("installing signal handlers")?;

    let ctx = SupervisorContext::new(settings, &args.passthrough);
    info!(
        lang = %ctx.settings().language(),
        root = %ctx.settings().watch().root.display(),
        cmd = %ctx.supervisor().launch_spec(),
        "gorun starting"
    );

    let (notifier, changes) = coalescer::channel();
    let poller = spawn_poller(ctx.scanner(), ctx.baseline(), notifier, timing.poll_interval);

    let runtime = Runtime::new(changes, ctx.supervisor(), RuntimeOptions::default());
    let restarts = tokio::spawn(runtime.run());

    let signal = signals.recv().await;
    info!(signal, "termination signal received");

    let outcome = ShutdownCoordinator::new(ctx.supervisor(), timing.grace_period)
        .shutdown()
        .await;
    info!(?outcome, "shutdown complete");

    poller.abort();
    restarts.abort();
    Ok(())
}
