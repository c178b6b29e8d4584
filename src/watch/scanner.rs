// src/watch/scanner.rs

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::trace;
use walkdir::WalkDir;

use crate::config::WatchConfig;
use crate::watch::baseline::Baseline;
use crate::watch::filter::WatchFilter;

/// A relevant file found to be newer than the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedChange {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Depth-first mtime scanner over a single watch root.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    filter: WatchFilter,
}

impl Scanner {
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            root: config.root.clone(),
            filter: WatchFilter::from_config(config),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree and return the first relevant file modified strictly
    /// after `since`. The walk stops at the first hit.
    ///
    /// Symlinks are not followed; a link counts by its own mtime.
    /// Entries that cannot be read (permission errors, files removed
    /// mid-walk) are skipped; the next poll will see them again.
    pub fn find_change(&self, since: SystemTime) -> Option<DetectedChange> {
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                let rel = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
                self.filter.admits(rel, entry.file_type().is_dir())
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    trace!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().is_dir() || !self.filter.is_relevant_file(entry.path()) {
                continue;
            }

            let modified = match entry
                .metadata()
                .map_err(std::io::Error::from)
                .and_then(|m| m.modified())
            {
                Ok(modified) => modified,
                Err(err) => {
                    trace!(path = %entry.path().display(), error = %err, "no mtime; skipping");
                    continue;
                }
            };

            if modified > since {
                return Some(DetectedChange {
                    path: entry.into_path(),
                    modified,
                });
            }
        }

        None
    }

    /// One poll cycle against `baseline`.
    ///
    /// On a hit the baseline advances to the instant the scan started (or to
    /// the file's mtime if that is later), so the triggering file cannot fire
    /// again while anything written during the scan is still caught by the
    /// next cycle.
    pub fn poll(&self, baseline: &Baseline) -> Option<DetectedChange> {
        let scan_started = SystemTime::now();
        let change = self.find_change(baseline.get())?;
        baseline.advance_to(scan_started.max(change.modified));
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    use filetime::{FileTime, set_file_mtime};

    fn touch(path: &Path, at: SystemTime) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"package main\n").unwrap();
        set_file_mtime(path, FileTime::from_system_time(at)).unwrap();
    }

    #[test]
    fn detects_newer_matching_file() {
        let tmp = tempfile::tempdir().unwrap();
        let t0 = SystemTime::now() - Duration::from_secs(60);
        touch(&tmp.path().join("old.go"), t0 - Duration::from_secs(10));
        touch(&tmp.path().join("pkg/new.go"), t0 + Duration::from_secs(1));

        let scanner = Scanner::new(&WatchConfig::new(tmp.path(), "go"));
        let change = scanner.find_change(t0).expect("change");
        assert!(change.path.ends_with("pkg/new.go"));
    }

    #[test]
    fn ignores_hidden_skipped_and_foreign_files() {
        let tmp = tempfile::tempdir().unwrap();
        let t0 = SystemTime::now() - Duration::from_secs(60);
        let later = t0 + Duration::from_secs(5);
        touch(&tmp.path().join(".git/hooks/x.go"), later);
        touch(&tmp.path().join(".venv/lib/y.go"), later);
        touch(&tmp.path().join(".hidden/z.go"), later);
        touch(&tmp.path().join("node_modules/n.go"), later);
        touch(&tmp.path().join(".dot.go"), later);
        touch(&tmp.path().join("notes.txt"), later);

        let config = WatchConfig::new(tmp.path(), "go").with_skip_dir("node_modules");
        assert_eq!(Scanner::new(&config).find_change(t0), None);

        let all = config.clone().with_all_files(true);
        let change = Scanner::new(&all).find_change(t0).expect("notes.txt counts");
        assert!(change.path.ends_with("notes.txt"));
    }

    #[test]
    fn hidden_root_is_still_scanned() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join(".checkout");
        let t0 = SystemTime::now() - Duration::from_secs(60);
        touch(&root.join("main.go"), t0 + Duration::from_secs(1));

        let scanner = Scanner::new(&WatchConfig::new(&root, "go"));
        assert!(scanner.find_change(t0).is_some());
    }

    #[test]
    fn poll_advances_baseline_and_does_not_refire() {
        let tmp = tempfile::tempdir().unwrap();
        let t0 = SystemTime::now() - Duration::from_secs(60);
        touch(&tmp.path().join("a.go"), t0 + Duration::from_millis(150));

        let scanner = Scanner::new(&WatchConfig::new(tmp.path(), "go"));
        let baseline = Baseline::new(t0);

        assert!(scanner.poll(&baseline).is_some());
        assert!(baseline.get() >= t0 + Duration::from_millis(150));
        assert!(scanner.poll(&baseline).is_none());
    }

    #[test]
    fn symlinked_source_counts_by_its_own_mtime() {
        let tmp = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let t0 = SystemTime::now() - Duration::from_secs(60);

        let target = outside.path().join("shared.go");
        touch(&target, t0 - Duration::from_secs(10));
        let link = tmp.path().join("main.go");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let scanner = Scanner::new(&WatchConfig::new(tmp.path(), "go"));

        let stale = FileTime::from_system_time(t0 - Duration::from_secs(5));
        filetime::set_symlink_file_times(&link, stale, stale).unwrap();
        assert_eq!(scanner.find_change(t0), None);

        let fresh = FileTime::from_system_time(t0 + Duration::from_secs(1));
        filetime::set_symlink_file_times(&link, fresh, fresh).unwrap();
        let change = scanner.find_change(t0).expect("link change");
        assert_eq!(change.path, link);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let scanner = Scanner::new(&WatchConfig::new(tmp.path().join("gone"), "go"));
        assert_eq!(scanner.find_change(SystemTime::UNIX_EPOCH), None);
    }
}
