//! Test support utilities for vaultview integration tests.
//!
//! Provides temp store files, scripted in-process stores and helper
//! commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod stores;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use stores::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with an isolated store file and home directory.
///
/// Child processes get `HOME`/`XDG_CONFIG_HOME` pointed into the temp dir so
/// a developer's own config never leaks in, and tests can run in parallel.
pub struct Test {
    /// Holds the store file
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create an environment with an empty store file.
    pub fn new() -> Self {
        Self::with_store(EMPTY_STORE)
    }

    /// Create an environment whose store file has `contents`.
    pub fn with_store(contents: &str) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");
        std::fs::write(dir.path().join(STORE_FILE), contents).expect("failed to write store");
        Self { dir, home }
    }

    /// Environment seeded with [`SAMPLE_STORE`].
    pub fn sample() -> Self {
        Self::with_store(SAMPLE_STORE)
    }

    /// Path of the store file.
    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join(STORE_FILE)
    }

    /// Current contents of the store file.
    pub fn store_contents(&self) -> String {
        std::fs::read_to_string(self.store_path()).expect("failed to read store")
    }

    /// Write a config file into the temp home and return its path.
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.home.path().join("config.toml");
        std::fs::write(&path, contents).expect("failed to write config");
        path
    }
}
