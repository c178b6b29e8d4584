// src/watch/mod.rs

//! Change detection by modification-time polling.
//!
//! This module is responsible for:
//! - Deciding which paths matter (`filter`).
//! - Walking the tree and comparing mtimes against a [`Baseline`] (`scanner`).
//! - Running that walk on a fixed interval and emitting change
//!   notifications (`poller`).
//!
//! It knows nothing about processes; it only turns "a relevant file is newer
//! than the baseline" into a payload-less notification.

pub mod baseline;
pub mod filter;
pub mod poller;
pub mod scanner;

pub use baseline::Baseline;
pub use filter::WatchFilter;
pub use poller::spawn_poller;
pub use scanner::{DetectedChange, Scanner};
