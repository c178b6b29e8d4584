// src/watch/filter.rs

//! Path filtering for the change scanner.
//!
//! Three rules decide whether a path can ever trigger a restart:
//! - directories in the skip set are pruned (matched by name, or by path
//!   relative to the scan root);
//! - anything whose name starts with `.` is ignored, including the whole
//!   subtree of a hidden directory;
//! - a file is relevant if it has the watched extension, or if all-files
//!   mode is on.
//!
//! The scan root itself is exempt from the first two rules, so `.` or a
//! hidden checkout directory can still be watched.

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::WatchConfig;

const HIDDEN_MARKER: char = '.';

#[derive(Debug, Clone)]
pub struct WatchFilter {
    skip_dirs: BTreeSet<String>,
    extension: String,
    all_files: bool,
}

impl WatchFilter {
    pub fn from_config(config: &WatchConfig) -> Self {
        Self {
            skip_dirs: config.skip_dirs.clone(),
            extension: config.extension.trim_start_matches('.').to_string(),
            all_files: config.all_files,
        }
    }

    /// Whether the traversal should visit (and, for directories, descend
    /// into) the entry at `rel`, a path relative to the scan root.
    ///
    /// An empty `rel` denotes the root and is always admitted.
    pub fn admits(&self, rel: &Path, is_dir: bool) -> bool {
        let Some(name) = rel.file_name() else {
            return true;
        };
        let name = name.to_string_lossy();

        if name.starts_with(HIDDEN_MARKER) {
            return false;
        }

        if is_dir && self.is_skipped_dir(&name, rel) {
            return false;
        }

        true
    }

    /// Whether a file (already admitted) counts as a watched source file.
    pub fn is_relevant_file(&self, path: &Path) -> bool {
        if self.all_files {
            return true;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy() == self.extension.as_str())
            .unwrap_or(false)
    }

    fn is_skipped_dir(&self, name: &str, rel: &Path) -> bool {
        if self.skip_dirs.contains(name) {
            return true;
        }
        let rel = rel.to_string_lossy().replace('\\', "/");
        self.skip_dirs.contains(rel.as_str())
    }
}
