// src/config/mod.rs

//! Configuration for gorun.
//!
//! Responsibilities:
//! - Map a language selector to its launch recipe (`profile.rs`).
//! - Define raw and validated settings (`model.rs`).
//! - Read the optional settings file and `GORUN_*` variables (`loader.rs`).
//! - Apply defaults and check basic sanity (`validate.rs`).

pub mod loader;
pub mod model;
pub mod profile;
pub mod validate;

pub use loader::{load_from_path, load_settings, load_settings_from};
pub use model::{RawSettings, Settings, Timing, WatchConfig};
pub use profile::{CommandProfile, Language, LaunchSpec};
