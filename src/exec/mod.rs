// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for running the supervised program with
//! `tokio::process::Command` and tearing it down again.
//!
//! - [`supervisor`] owns the single child process and its restart sequence.
//! - [`signal`] sends signals to whole process groups and classifies exits.
//! - [`backend`] provides the `ProcessBackend` trait the runtime drives, and
//!   which tests can replace with a fake implementation.

pub mod backend;
pub mod signal;
pub mod supervisor;

pub use backend::ProcessBackend;
pub use supervisor::{ChildExit, ChildHandle, ProcessSupervisor, SupervisedProcess};
