//! Shared test utilities for the pansite test suite.
//!
//! Tests build their content trees inline in a tempdir; these helpers keep
//! that terse: `write_file` for dropping a document at a relative path,
//! `sample_config` for a [`SiteConfig`] wired to a tempdir layout without
//! going through a config file on disk.

use crate::config::SiteConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `dir/name`, creating parent directories, and return
/// the full path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// A config rooted at `base` with the conventional layout: `content/`,
/// `public/`, includes under `resources/`. Index synthesis on, rerender off.
pub fn sample_config(base: &Path) -> SiteConfig {
    SiteConfig {
        content: base.join("content"),
        public: base.join("public"),
        resources: Some(base.join("resources")),
        header: base.join("resources/header.html"),
        before: base.join("resources/before-body.html"),
        after: base.join("resources/after-body.html"),
        filters: Vec::new(),
        make_index_files: true,
        generated_index_suffix: "._index.md".to_string(),
        mustache_rerender: false,
        base_dir: base.to_path_buf(),
    }
}
