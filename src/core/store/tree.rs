//! In-memory secret tree shared by the store backends.

use chrono::{SecondsFormat, Utc};
use tracing::trace;

use crate::core::constants::{ROOT, SEPARATOR};
use crate::core::domain::{Metadata, SecretRecord, SecretValue};
use crate::core::path;
use crate::core::types::{ChildName, EngineName, SecretData, SecretPath};
use crate::error::{Error, Result};

/// A stored leaf.
#[derive(Debug, Clone)]
pub(super) struct Leaf {
    pub engine: EngineName,
    pub path: SecretPath,
    pub record: SecretRecord,
}

/// Engines and their leaves, in insertion order.
#[derive(Debug, Clone, Default)]
pub(super) struct Tree {
    engines: Vec<EngineName>,
    leaves: Vec<Leaf>,
}

fn not_found(engine: &str, path: &str) -> Error {
    Error::PathNotFound(format!("{}{}{}", engine, SEPARATOR, path))
}

impl Tree {
    pub fn add_engine(&mut self, name: &str) {
        if !self.engines.iter().any(|e| e == name) {
            self.engines.push(name.to_string());
        }
    }

    /// Insert or replace a leaf as-is, creating its engine if needed.
    pub fn insert(&mut self, engine: &str, leaf_path: &str, record: SecretRecord) -> Result<()> {
        path::split_leaf(leaf_path)?;
        self.add_engine(engine);
        match self.find_mut(engine, leaf_path) {
            Some(leaf) => leaf.record = record,
            None => self.leaves.push(Leaf {
                engine: engine.to_string(),
                path: leaf_path.to_string(),
                record,
            }),
        }
        Ok(())
    }

    pub fn engines(&self) -> Vec<EngineName> {
        self.engines.clone()
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn children(&self, engine: &str, dir: &str) -> Result<Vec<ChildName>> {
        path::validate_dir(dir)?;
        if !self.has_engine(engine) {
            return Err(not_found(engine, dir));
        }

        let mut children: Vec<ChildName> = Vec::new();
        for leaf in self.leaves.iter().filter(|l| l.engine == engine) {
            let Some(rest) = leaf.path.strip_prefix(dir) else {
                continue;
            };
            let child = match rest.find(SEPARATOR) {
                Some(idx) => &rest[..=idx],
                None => rest,
            };
            if !children.iter().any(|c| c == child) {
                children.push(child.to_string());
            }
        }

        if children.is_empty() && dir != ROOT {
            return Err(not_found(engine, dir));
        }
        trace!(engine, dir, count = children.len(), "listed children");
        Ok(children)
    }

    pub fn read(&self, engine: &str, leaf_path: &str) -> Result<SecretRecord> {
        path::split_leaf(leaf_path)?;
        self.leaves
            .iter()
            .find(|l| l.engine == engine && l.path == leaf_path)
            .map(|l| l.record.clone())
            .ok_or_else(|| not_found(engine, leaf_path))
    }

    /// Replace a leaf's data with string values and bump its version.
    pub fn write(&mut self, engine: &str, leaf_path: &str, data: &SecretData) -> Result<()> {
        path::split_leaf(leaf_path)?;
        if !self.has_engine(engine) {
            return Err(not_found(engine, leaf_path));
        }

        let values = data
            .iter()
            .map(|(k, v)| (k.clone(), SecretValue::String(v.clone())))
            .collect();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        match self.find_mut(engine, leaf_path) {
            Some(leaf) => {
                let version = leaf.record.metadata.version + 1;
                leaf.record = SecretRecord::new(values, Metadata::new(version, Some(now)));
            }
            None => self.leaves.push(Leaf {
                engine: engine.to_string(),
                path: leaf_path.to_string(),
                record: SecretRecord::new(values, Metadata::new(1, Some(now))),
            }),
        }
        Ok(())
    }

    /// Remove a leaf, or every leaf under a directory path.
    ///
    /// Returns the number of leaves removed.
    pub fn remove(&mut self, engine: &str, target: &str) -> usize {
        let before = self.leaves.len();
        let is_dir = path::is_directory(target);
        self.leaves.retain(|l| {
            let hit = if is_dir {
                l.path.starts_with(target)
            } else {
                l.path == target
            };
            !(l.engine == engine && hit)
        });
        before - self.leaves.len()
    }

    fn has_engine(&self, engine: &str) -> bool {
        self.engines.iter().any(|e| e == engine)
    }

    fn find_mut(&mut self, engine: &str, leaf_path: &str) -> Option<&mut Leaf> {
        self.leaves
            .iter_mut()
            .find(|l| l.engine == engine && l.path == leaf_path)
    }
}
