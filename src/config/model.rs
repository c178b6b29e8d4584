// src/config/model.rs

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::config::profile::{CommandProfile, Language};

/// Directories that are never descended into.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[".git", ".venv"];

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 10_000;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 100;

/// Unvalidated settings, as read from an optional `gorun.toml` and then
/// overlaid with `GORUN_*` environment variables.
///
/// ```toml
/// lang = "python3"
/// scan_dir = "src"
/// skip_dirs = ["node_modules", "build"]
/// all_files = false
/// poll_interval_ms = 500
/// grace_period_ms = 10000
/// ```
///
/// Every field is optional; missing values fall back to built-in defaults in
/// [`Settings::try_from`](crate::config::validate).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    pub lang: Option<Language>,
    pub scan_dir: Option<PathBuf>,
    #[serde(default)]
    pub skip_dirs: Vec<String>,
    pub all_files: Option<bool>,
    pub poll_interval_ms: Option<u64>,
    pub grace_period_ms: Option<u64>,
    pub settle_delay_ms: Option<u64>,
}

/// What to scan and which files count as relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub root: PathBuf,
    /// Directory names (or root-relative paths) to prune.
    pub skip_dirs: BTreeSet<String>,
    /// Watched extension without the leading dot. Ignored when `all_files`.
    pub extension: String,
    pub all_files: bool,
}

impl WatchConfig {
    /// Watch config with the default skip set for the given root/extension.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            extension: extension.into(),
            all_files: false,
        }
    }

    pub fn with_skip_dir(mut self, dir: impl Into<String>) -> Self {
        self.skip_dirs.insert(dir.into());
        self
    }

    pub fn with_all_files(mut self, all_files: bool) -> Self {
        self.all_files = all_files;
        self
    }
}

/// Timing knobs for polling, restart and shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub poll_interval: Duration,
    /// How long a child gets to exit after the graceful signal on shutdown.
    pub grace_period: Duration,
    /// Pause after a forced kill so ports / fds are released.
    pub settle_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            grace_period: Duration::from_millis(DEFAULT_GRACE_PERIOD_MS),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
        }
    }
}

/// Validated settings used by the rest of the application.
///
/// Construct via `Settings::try_from(RawSettings)` so validation always runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    language: Language,
    watch: WatchConfig,
    timing: Timing,
}

impl Settings {
    pub(crate) fn new_unchecked(language: Language, watch: WatchConfig, timing: Timing) -> Self {
        Self {
            language,
            watch,
            timing,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn profile(&self) -> CommandProfile {
        self.language.profile()
    }

    pub fn watch(&self) -> &WatchConfig {
        &self.watch
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }
}
