//! In-process secret store.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::tree::Tree;
use super::SecretStore;
use crate::core::domain::{Metadata, SecretRecord, SecretValue};
use crate::core::types::{ChildName, EngineName, SecretData};
use crate::error::{Error, Result};

/// Secret store held entirely in memory.
///
/// Useful for tests and demos; also the base of [`super::File`].
#[derive(Debug, Default)]
pub struct Memory {
    tree: RwLock<Tree>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount an engine, which may stay empty.
    pub fn with_engine(self, name: &str) -> Self {
        if let Ok(mut tree) = self.tree.write() {
            tree.add_engine(name);
        }
        self
    }

    /// Add a leaf with string values at version 1.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a leaf path; intended for building fixtures.
    pub fn with_secret(self, engine: &str, path: &str, pairs: &[(&str, &str)]) -> Self {
        let data = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), SecretValue::from(*v)))
            .collect();
        self.insert(engine, path, SecretRecord::new(data, Metadata::new(1, None)))
            .expect("fixture leaf path must not end with '/'");
        self
    }

    /// Insert or replace a leaf record verbatim.
    pub fn insert(&self, engine: &str, path: &str, record: SecretRecord) -> Result<()> {
        self.write_tree()?.insert(engine, path, record)
    }

    /// Delete a leaf, or a whole directory when `path` ends with '/'.
    ///
    /// Simulates another client removing secrets behind the session's back.
    pub fn remove(&self, engine: &str, path: &str) -> Result<usize> {
        let removed = self.write_tree()?.remove(engine, path);
        debug!(engine, path, removed, "removed from memory store");
        Ok(removed)
    }

    pub(super) fn from_tree(tree: Tree) -> Self {
        Self {
            tree: RwLock::new(tree),
        }
    }

    pub(super) fn read_tree(&self) -> Result<RwLockReadGuard<'_, Tree>> {
        self.tree
            .read()
            .map_err(|_| Error::StoreUnavailable("memory store lock poisoned".to_string()))
    }

    pub(super) fn write_tree(&self) -> Result<RwLockWriteGuard<'_, Tree>> {
        self.tree
            .write()
            .map_err(|_| Error::StoreUnavailable("memory store lock poisoned".to_string()))
    }
}

impl SecretStore for Memory {
    fn list_engines(&self) -> Result<Vec<EngineName>> {
        Ok(self.read_tree()?.engines())
    }

    fn list_children(&self, engine: &str, path: &str) -> Result<Vec<ChildName>> {
        self.read_tree()?.children(engine, path)
    }

    fn read_leaf(&self, engine: &str, path: &str) -> Result<SecretRecord> {
        self.read_tree()?.read(engine, path)
    }

    fn write_leaf(&self, engine: &str, path: &str, data: &SecretData) -> Result<()> {
        debug!(engine, path, keys = data.len(), "writing leaf");
        self.write_tree()?.write(engine, path, data)
    }
}
