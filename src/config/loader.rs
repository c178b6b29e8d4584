// src/config/loader.rs

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawSettings, Settings};
use crate::config::profile::Language;
use crate::errors::Result;

pub const ENV_CONFIG: &str = "GORUN_CONFIG";
pub const ENV_LANG: &str = "GORUN_LANG";
pub const ENV_SCAN_DIR: &str = "GORUN_SCAN_DIR";
pub const ENV_SKIP_DIRS: &str = "GORUN_SKIP_DIRS";
pub const ENV_ALL_FILES: &str = "GORUN_ALL_FILES";

/// Name of the optional project-local settings file.
pub const DEFAULT_CONFIG_FILE: &str = "gorun.toml";

/// Load a settings file from a given path.
///
/// This only performs TOML deserialization; defaults and validation are
/// applied when converting into [`Settings`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let raw: RawSettings = toml::from_str(&contents)?;
    Ok(raw)
}

/// Resolve settings from the process environment and the current directory.
pub fn load_settings() -> Result<Settings> {
    let env: HashMap<String, String> = std::env::vars().collect();
    let cwd = std::env::current_dir()?;
    load_settings_from(&env, &cwd)
}

/// Resolve settings from an explicit environment map.
///
/// Priority (lowest to highest): built-in defaults, the settings file
/// (`GORUN_CONFIG`, else `gorun.toml` in `cwd` when present), then the
/// `GORUN_*` variables.
pub fn load_settings_from(env: &HashMap<String, String>, cwd: &Path) -> Result<Settings> {
    let mut raw = match config_file_path(env, cwd) {
        Some(path) => {
            debug!(path = %path.display(), "loading settings file");
            load_from_path(&path)?
        }
        None => RawSettings::default(),
    };

    apply_env_overrides(&mut raw, env)?;
    Settings::try_from(raw)
}

/// An explicitly named file must exist; the default one is optional.
fn config_file_path(env: &HashMap<String, String>, cwd: &Path) -> Option<PathBuf> {
    if let Some(explicit) = non_empty(env, ENV_CONFIG) {
        return Some(PathBuf::from(explicit));
    }
    let default = cwd.join(DEFAULT_CONFIG_FILE);
    default.is_file().then_some(default)
}

fn apply_env_overrides(raw: &mut RawSettings, env: &HashMap<String, String>) -> Result<()> {
    if let Some(lang) = non_empty(env, ENV_LANG) {
        raw.lang = Some(lang.parse::<Language>()?);
    }

    if let Some(dir) = non_empty(env, ENV_SCAN_DIR) {
        raw.scan_dir = Some(PathBuf::from(dir));
    }

    if let Some(list) = non_empty(env, ENV_SKIP_DIRS) {
        raw.skip_dirs.extend(
            list.split(':')
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string()),
        );
    }

    if let Some(flag) = non_empty(env, ENV_ALL_FILES) {
        raw.all_files = Some(flag == "1");
    }

    Ok(())
}

fn non_empty<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key).map(|s| s.as_str()).filter(|s| !s.is_empty())
}
