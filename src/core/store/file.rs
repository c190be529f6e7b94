//! TOML-file-backed secret store.
//!
//! The whole tree is loaded at open and rewritten after every successful
//! write:
//!
//! ```toml
//! engines = ["kv", "scratch"]
//!
//! [[secret]]
//! engine = "kv"
//! path = "app/db/creds"
//! version = 3
//! created_time = "2024-03-05T14:07:09Z"
//!
//! [secret.data]
//! username = "admin"
//! port = 5432
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::memory::Memory;
use super::tree::Tree;
use super::SecretStore;
use crate::core::domain::{Metadata, SecretRecord, SecretValue};
use crate::core::types::{ChildName, EngineName, SecretData};
use crate::error::{Error, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
struct FileFormat {
    /// Engines to mount even when they hold no secrets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    engines: Vec<EngineName>,
    #[serde(default, rename = "secret")]
    secrets: Vec<FileSecret>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileSecret {
    engine: EngineName,
    path: String,
    #[serde(default = "default_version")]
    version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_time: Option<String>,
    #[serde(default)]
    data: toml::Table,
}

fn default_version() -> u64 {
    1
}

/// Secret store persisted to a TOML file.
#[derive(Debug)]
pub struct File {
    path: PathBuf,
    memory: Memory,
}

impl File {
    /// Load a store file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file can't be read and `StoreFormat` if it is not
    /// a valid secret tree.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!(path = %path.display(), "opening store file");

        let contents = std::fs::read_to_string(&path)?;
        let format: FileFormat =
            toml::from_str(&contents).map_err(|e| Error::StoreFormat(e.to_string()))?;

        let mut tree = Tree::default();
        for engine in &format.engines {
            tree.add_engine(engine);
        }
        for secret in format.secrets {
            let data = secret
                .data
                .into_iter()
                .map(|(k, v)| (k, SecretValue::from(v)))
                .collect();
            let record =
                SecretRecord::new(data, Metadata::new(secret.version, secret.created_time));
            tree.insert(&secret.engine, &secret.path, record)
                .map_err(|e| {
                    Error::StoreFormat(format!("secret {}:{}: {}", secret.engine, secret.path, e))
                })?;
        }

        debug!(
            engines = tree.engines().len(),
            secrets = tree.leaves().len(),
            "store file loaded"
        );

        Ok(Self {
            path,
            memory: Memory::from_tree(tree),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, tree: &Tree) -> Result<()> {
        let used: Vec<&str> = tree.leaves().iter().map(|l| l.engine.as_str()).collect();
        let format = FileFormat {
            engines: tree
                .engines()
                .into_iter()
                .filter(|e| !used.contains(&e.as_str()))
                .collect(),
            secrets: tree
                .leaves()
                .iter()
                .map(|leaf| FileSecret {
                    engine: leaf.engine.clone(),
                    path: leaf.path.clone(),
                    version: leaf.record.metadata.version,
                    created_time: leaf.record.metadata.created_time.clone(),
                    data: leaf
                        .record
                        .data
                        .iter()
                        .filter_map(|(k, v)| v.to_toml().map(|t| (k.clone(), t)))
                        .collect(),
                })
                .collect(),
        };

        let contents =
            toml::to_string_pretty(&format).map_err(|e| Error::StoreFormat(e.to_string()))?;
        std::fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), "store file saved");
        Ok(())
    }
}

impl SecretStore for File {
    fn list_engines(&self) -> Result<Vec<EngineName>> {
        self.memory.list_engines()
    }

    fn list_children(&self, engine: &str, path: &str) -> Result<Vec<ChildName>> {
        self.memory.list_children(engine, path)
    }

    fn read_leaf(&self, engine: &str, path: &str) -> Result<SecretRecord> {
        self.memory.read_leaf(engine, path)
    }

    /// Apply the write to a copy of the tree and persist it; the in-memory
    /// tree only changes once the file is written.
    fn write_leaf(&self, engine: &str, path: &str, data: &SecretData) -> Result<()> {
        let mut tree = self.memory.write_tree()?;
        let mut next = tree.clone();
        next.write(engine, path, data)?;
        self.save(&next).map_err(|e| match e {
            Error::Io(io) => Error::StoreUnavailable(format!("failed to save store: {}", io)),
            other => other,
        })?;
        *tree = next;
        Ok(())
    }
}
