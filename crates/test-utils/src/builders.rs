#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use filetime::{FileTime, set_file_mtime};
use tempfile::TempDir;

use gorun::config::WatchConfig;

/// Builder for a temporary source tree with controlled modification times.
pub struct TreeBuilder {
    dir: TempDir,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Create (or overwrite) `rel` and set its mtime to `at`.
    pub fn file(self, rel: &str, at: SystemTime) -> Self {
        self.touch(rel, at);
        self
    }

    /// Like [`TreeBuilder::file`], for use after the tree has been built.
    pub fn touch(&self, rel: &str, at: SystemTime) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, b"// generated by TreeBuilder\n").expect("write file");
        set_file_mtime(&path, FileTime::from_system_time(at)).expect("set mtime");
    }

    /// Watch config rooted at this tree for the given extension.
    pub fn watch_config(&self, extension: &str) -> WatchConfig {
        WatchConfig::new(self.root(), extension)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
