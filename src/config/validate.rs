// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{
    DEFAULT_GRACE_PERIOD_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SETTLE_DELAY_MS, RawSettings,
    Settings, Timing, WatchConfig,
};
use crate::errors::{GorunError, Result};

impl TryFrom<RawSettings> for Settings {
    type Error = GorunError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        validate_timing(&raw)?;

        let language = raw.lang.unwrap_or_default();
        let profile = language.profile();

        let root = raw.scan_dir.unwrap_or_else(|| PathBuf::from("."));
        validate_root(&root)?;

        let mut watch =
            WatchConfig::new(root, profile.extension).with_all_files(raw.all_files.unwrap_or(false));
        for dir in raw.skip_dirs {
            let dir = dir.trim().trim_end_matches('/');
            if !dir.is_empty() {
                watch.skip_dirs.insert(dir.to_string());
            }
        }

        let timing = Timing {
            poll_interval: Duration::from_millis(
                raw.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            ),
            grace_period: Duration::from_millis(
                raw.grace_period_ms.unwrap_or(DEFAULT_GRACE_PERIOD_MS),
            ),
            settle_delay: Duration::from_millis(
                raw.settle_delay_ms.unwrap_or(DEFAULT_SETTLE_DELAY_MS),
            ),
        };

        Ok(Settings::new_unchecked(language, watch, timing))
    }
}

fn validate_timing(raw: &RawSettings) -> Result<()> {
    if raw.poll_interval_ms == Some(0) {
        return Err(GorunError::ConfigError(
            "poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    if raw.grace_period_ms == Some(0) {
        return Err(GorunError::ConfigError(
            "grace_period_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_root(root: &std::path::Path) -> Result<()> {
    if !root.is_dir() {
        return Err(GorunError::ConfigError(format!(
            "scan directory {:?} does not exist or is not a directory",
            root
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile::Language;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = Settings::try_from(RawSettings::default()).expect("valid");
        assert_eq!(settings.language(), Language::Go);
        assert_eq!(settings.watch().root, PathBuf::from("."));
        assert_eq!(settings.watch().extension, "go");
        assert!(!settings.watch().all_files);
        assert!(settings.watch().skip_dirs.contains(".git"));
        assert!(settings.watch().skip_dirs.contains(".venv"));
        assert_eq!(settings.timing(), Timing::default());
    }

    #[test]
    fn extra_skip_dirs_are_merged_and_blank_entries_dropped() {
        let raw = RawSettings {
            skip_dirs: vec!["vendor".into(), "".into(), "build/".into()],
            ..RawSettings::default()
        };
        let settings = Settings::try_from(raw).expect("valid");
        let skip = &settings.watch().skip_dirs;
        assert!(skip.contains("vendor"));
        assert!(skip.contains("build"));
        assert!(skip.contains(".git"));
        assert!(!skip.contains(""));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let raw = RawSettings {
            poll_interval_ms: Some(0),
            ..RawSettings::default()
        };
        let err = Settings::try_from(raw).unwrap_err();
        assert!(matches!(err, GorunError::ConfigError(_)));
    }

    #[test]
    fn missing_scan_dir_is_rejected() {
        let raw = RawSettings {
            scan_dir: Some(PathBuf::from("/definitely/not/here/gorun")),
            ..RawSettings::default()
        };
        let err = Settings::try_from(raw).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
