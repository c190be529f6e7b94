//! Directory listing cache.
//!
//! Holds what the user has already seen this session, keyed by
//! (engine, directory path). Entries never expire on their own; they are only
//! replaced by a newer listing or invalidated when the store says the
//! directory is gone.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::core::types::{ChildName, EngineName, SecretPath};

/// Identifies one directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    engine: EngineName,
    path: SecretPath,
}

impl CacheKey {
    pub fn new(engine: impl Into<EngineName>, path: impl Into<SecretPath>) -> Self {
        Self {
            engine: engine.into(),
            path: path.into(),
        }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Key for another directory of the same engine.
    pub fn sibling(&self, path: impl Into<SecretPath>) -> Self {
        Self::new(self.engine.clone(), path)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.engine, self.path)
    }
}

/// Cached listings in the store's return order.
#[derive(Debug, Default)]
pub struct ListingCache {
    entries: HashMap<CacheKey, Vec<ChildName>>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a listing. Never fetches.
    pub fn get(&self, key: &CacheKey) -> Option<&[ChildName]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite a listing.
    pub fn put(&mut self, key: CacheKey, children: Vec<ChildName>) {
        trace!(key = %key, count = children.len(), "cache put");
        self.entries.insert(key, children);
    }

    /// Drop a listing, returning what was cached.
    pub fn invalidate(&mut self, key: &CacheKey) -> Option<Vec<ChildName>> {
        trace!(key = %key, "cache invalidate");
        self.entries.remove(key)
    }

    /// Remove one child name from a cached parent listing.
    ///
    /// Returns `true` if the parent was cached and contained the child.
    pub fn remove_child(&mut self, parent: &CacheKey, child: &str) -> bool {
        let Some(children) = self.entries.get_mut(parent) else {
            return false;
        };
        match children.iter().position(|c| c == child) {
            Some(idx) => {
                children.remove(idx);
                trace!(key = %parent, child, "cache removed child");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
