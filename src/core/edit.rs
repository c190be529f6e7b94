//! Edit session for one leaf secret.
//!
//! Keeps the values as they were when the leaf was opened next to the values
//! being edited, and only writes back when the two actually differ.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::core::domain::{Metadata, SecretRecord};
use crate::core::path;
use crate::core::types::{EngineName, SecretData, SecretPath};
use crate::error::Result;

/// What a commit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing differed; the store was not called.
    Unchanged,
    /// The buffer was written.
    Saved,
}

/// A snapshot of the buffer handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    data: SecretData,
}

impl Draft {
    pub fn data(&self) -> &SecretData {
        &self.data
    }

    pub fn into_data(self) -> SecretData {
        self.data
    }
}

/// Original and edited values of an open leaf.
#[derive(Debug, Clone)]
pub struct EditSession {
    engine: EngineName,
    path: SecretPath,
    name: String,
    metadata: Metadata,
    original: SecretData,
    buffer: SecretData,
}

impl EditSession {
    /// Start editing a leaf. Values are copied; `record` is not retained.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if `path` is a directory path.
    pub fn open(engine: &str, path: &str, record: &SecretRecord) -> Result<Self> {
        let name = path::leaf_name(path)?.to_string();
        let original = record.display_data();
        Ok(Self {
            engine: engine.to_string(),
            path: path.to_string(),
            name,
            metadata: record.metadata.clone(),
            buffer: original.clone(),
            original,
        })
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Leaf name, e.g. `creds` for `app/db/creds`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Current (possibly edited) values.
    pub fn values(&self) -> &SecretData {
        &self.buffer
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.buffer.get(key).map(String::as_str)
    }

    /// Set a value in the edit buffer. New keys are allowed.
    pub fn set_value(&mut self, key: &str, value: &str) {
        self.buffer.insert(key.to_string(), value.to_string());
    }

    /// Whether any key was added, removed or changed since open or the last
    /// successful commit.
    pub fn has_changes(&self) -> bool {
        self.original != self.buffer
    }

    /// Keys whose value differs from the original, in key order.
    pub fn changed_keys(&self) -> Vec<&str> {
        let keys: BTreeSet<&String> = self.original.keys().chain(self.buffer.keys()).collect();
        keys.into_iter()
            .filter(|k| self.original.get(*k) != self.buffer.get(*k))
            .map(String::as_str)
            .collect()
    }

    /// Throw away unsaved edits.
    pub fn discard(&mut self) {
        if self.has_changes() {
            debug!(path = %self.path, "discarding edits");
        }
        self.buffer = self.original.clone();
    }

    /// Snapshot the buffer for writing, or `None` if there is nothing to save.
    pub fn begin_commit(&self) -> Option<Draft> {
        self.has_changes().then(|| Draft {
            data: self.buffer.clone(),
        })
    }

    /// Record the result of writing `draft`.
    ///
    /// On success the draft becomes the new original. On failure nothing
    /// changes and the error is returned.
    pub fn finish_commit(&mut self, draft: Draft, result: Result<()>) -> Result<CommitOutcome> {
        result?;
        info!(engine = %self.engine, path = %self.path, "secret saved");
        self.original = draft.data;
        Ok(CommitOutcome::Saved)
    }

    /// Write the buffer through `write` if it differs from the original.
    ///
    /// `write` is called at most once, with `(engine, path, values)`.
    pub fn commit<F>(&mut self, write: F) -> Result<CommitOutcome>
    where
        F: FnOnce(&str, &str, &SecretData) -> Result<()>,
    {
        let Some(draft) = self.begin_commit() else {
            debug!(path = %self.path, "nothing to save");
            return Ok(CommitOutcome::Unchanged);
        };
        let result = write(&self.engine, &self.path, draft.data());
        self.finish_commit(draft, result)
    }

    /// Take in a freshly read record for the same leaf.
    ///
    /// Metadata is always updated; values are replaced only when there are
    /// no unsaved edits to lose.
    pub fn reload(&mut self, record: &SecretRecord) {
        self.metadata = record.metadata.clone();
        if !self.has_changes() {
            self.original = record.display_data();
            self.buffer = self.original.clone();
        }
    }
}
